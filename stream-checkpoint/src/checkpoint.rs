use crate::CheckpointStore;
use crate::client::Client;
use crate::client::redis_client::RedisClient;
use crate::config::CheckpointConfig;
use tracing::{debug, info, warn};

/// Literal segment that separates the application name from the shard position in every key.
const KEY_SEGMENT: &str = "checkpoint";

/// Checkpoint stores and retrieves the last processed sequence number of every shard of an
/// application. Upon failover, record processing is resumed from the stored position.
///
/// The backend [Client] is shared, the checkpoint never closes it. Cloning a checkpoint is cheap
/// and the clones write to the same backend, so one clone can be handed to each shard worker.
#[derive(Clone)]
pub struct Checkpoint<C> {
    app_name: String,
    client: C,
}

impl<C: Client> Checkpoint<C> {
    /// Creates a checkpoint for `app_name` after verifying the backend answers a ping. No
    /// checkpoint is returned if the backend is unreachable.
    pub async fn new(app_name: impl Into<String>, client: C) -> crate::Result<Self> {
        let app_name = app_name.into();

        client
            .ping()
            .await
            .map_err(|e| crate::Error::BackendUnavailable(e.to_string()))?;

        info!(app_name = %app_name, "Created checkpoint store");
        Ok(Self { app_name, client })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get fetches the checkpoint of a shard. An empty string means no checkpoint was recorded,
    /// a failing backend reads the same way.
    pub async fn get(&self, stream_name: &str, shard_id: &str) -> crate::Result<String> {
        let key = self.key(stream_name, shard_id);
        debug!(key = %key, "Reading checkpoint");

        match self.client.get(&key).await {
            Ok(value) => Ok(value.unwrap_or_default()),
            Err(e) => {
                warn!(key = %key, error = ?e, "Failed to read checkpoint, treating it as absent");
                Ok(String::new())
            }
        }
    }

    /// Set stores the checkpoint of a shard without expiry, overwriting any earlier value.
    pub async fn set(
        &self,
        stream_name: &str,
        shard_id: &str,
        sequence_number: &str,
    ) -> crate::Result<()> {
        if sequence_number.is_empty() {
            return Err(crate::Error::InvalidArgument(
                "sequence number should not be empty".to_string(),
            ));
        }

        let key = self.key(stream_name, shard_id);
        debug!(key = %key, sequence_number, "Writing checkpoint");

        self.client
            .set(&key, sequence_number, None)
            .await
            .map_err(|e| crate::Error::BackendWrite(e.to_string()))
    }

    fn key(&self, stream_name: &str, shard_id: &str) -> String {
        format!("{}:{KEY_SEGMENT}:{stream_name}:{shard_id}", self.app_name)
    }
}

impl Checkpoint<RedisClient> {
    /// Connects to the Redis described by `config` and creates a checkpoint on top of it.
    ///
    /// The connection is established eagerly, so an unreachable Redis is reported as
    /// [crate::Error::Connection] before the liveness ping runs.
    pub async fn from_config(config: &CheckpointConfig) -> crate::Result<Self> {
        let client = RedisClient::new(config.redis.mode()?).await?;
        Self::new(config.app_name.clone(), client).await
    }
}

impl<C: Client + Sync> CheckpointStore for Checkpoint<C> {
    async fn get(&self, stream_name: &str, shard_id: &str) -> crate::Result<String> {
        Checkpoint::get(self, stream_name, shard_id).await
    }

    async fn set(
        &self,
        stream_name: &str,
        shard_id: &str,
        sequence_number: &str,
    ) -> crate::Result<()> {
        Checkpoint::set(self, stream_name, shard_id, sequence_number).await
    }
}

/// Builds a [Checkpoint] when the client may not be known up front.
pub struct CheckpointBuilder<C> {
    app_name: String,
    client: Option<C>,
}

impl<C: Client> CheckpointBuilder<C> {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            client: None,
        }
    }

    pub fn client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    pub async fn build(self) -> crate::Result<Checkpoint<C>> {
        let Some(client) = self.client else {
            return Err(crate::Error::InvalidArgument(
                "checkpoint client is not set".to_string(),
            ));
        };
        Checkpoint::new(self.app_name, client).await
    }
}
