use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::info;

use crate::client::redis_client::RedisMode;
use crate::{Error, Result};

const ENV_PREFIX: &str = "CHECKPOINT";
const ENV_CONFIG_PATH: &str = "CHECKPOINT_CONFIG_PATH";
const ENV_SEPARATOR: &str = "__";
const SENTINEL_URLS_KEY: &str = "redis.sentinel.urls";

const DEFAULT_APP_NAME: &str = "default";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Settings needed to build a Redis backed [crate::Checkpoint].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Prefix of every checkpoint key, one per consuming application.
    pub app_name: String,
    pub redis: RedisConfig,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        CheckpointConfig {
            app_name: DEFAULT_APP_NAME.to_string(),
            redis: RedisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RedisConfig {
    pub url: String,
    /// When set, the master is discovered through sentinels and `url` is ignored.
    pub sentinel: Option<SentinelConfig>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            url: DEFAULT_REDIS_URL.to_string(),
            sentinel: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SentinelConfig {
    pub urls: Vec<String>,
    pub master_name: String,
}

impl RedisConfig {
    pub fn mode(&self) -> Result<RedisMode> {
        let Some(sentinel) = &self.sentinel else {
            return Ok(RedisMode::SingleUrl {
                url: self.url.clone(),
            });
        };

        if sentinel.urls.is_empty() {
            return Err(Error::Config("sentinel urls are empty".to_string()));
        }
        if sentinel.master_name.is_empty() {
            return Err(Error::Config("sentinel master name is empty".to_string()));
        }

        Ok(RedisMode::Sentinel {
            sentinel_urls: sentinel.urls.clone(),
            master_name: sentinel.master_name.clone(),
        })
    }
}

impl CheckpointConfig {
    /// Loads the configuration from the optional TOML file named by `CHECKPOINT_CONFIG_PATH`,
    /// overridden by `CHECKPOINT_*` environment variables (`CHECKPOINT_REDIS__URL` sets
    /// `redis.url`). Anything unset keeps its default.
    pub fn load() -> Result<Self> {
        let config_path = env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from);
        Self::load_from(config_path.as_deref(), None)
    }

    /// Same as [CheckpointConfig::load], with explicit inputs. `env_vars` replaces the process
    /// environment when given.
    pub(crate) fn load_from(
        config_path: Option<&Path>,
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            info!(path = %path.display(), "Loading checkpoint config file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key(SENTINEL_URLS_KEY)
                    .try_parsing(true)
                    .source(env_vars),
            )
            .build()
            .map_err(|e| Error::Config(format!("generating checkpoint configuration: {e}")))?;

        settings
            .try_deserialize::<Self>()
            .map_err(|e| Error::Config(format!("parsing checkpoint configuration: {e}")))
    }
}
