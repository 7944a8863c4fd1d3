use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("InvalidArgument Error - {0}")]
    InvalidArgument(String),

    // liveness probe failed while constructing a checkpoint
    #[error("BackendUnavailable Error - {0}")]
    BackendUnavailable(String),

    #[error("BackendWrite Error - {0}")]
    BackendWrite(String),

    #[error("Redis Error - {0}")]
    Redis(String),

    #[error("Connection Error - {0}")]
    Connection(String),

    #[error("Config Error - {0}")]
    Config(String),
}
