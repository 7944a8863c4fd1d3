//! Durable checkpoints for stream consumers. For every (application, stream, shard) the last
//! processed sequence number is persisted in a key-value backend, so that a restarted consumer
//! resumes where it stopped.
//!
//! Keys have the layout `<app_name>:checkpoint:<stream_name>:<shard_id>`. Components are not
//! escaped, callers must avoid `:` in names that could make two positions collide.

pub(crate) mod error;

pub use error::Error;
pub use error::Result;

/// Key-value capability used by [Checkpoint] and its Redis and in-memory implementations.
pub mod client;

/// Settings for building a Redis backed [Checkpoint].
pub mod config;

mod checkpoint;
pub use checkpoint::{Checkpoint, CheckpointBuilder};

pub use client::Client;
pub use client::in_memory_client::InMemoryClient;
pub use client::redis_client::{RedisClient, RedisMode};
pub use crate::config::CheckpointConfig;

/// CheckpointStore is what a stream consumer needs to resume its shards.
#[trait_variant::make(Send)]
pub trait CheckpointStore {
    /// Returns the last stored sequence number of the shard, or an empty string if there is none.
    async fn get(&self, stream_name: &str, shard_id: &str) -> Result<String>;

    /// Stores the sequence number of the last processed record of the shard.
    async fn set(&self, stream_name: &str, shard_id: &str, sequence_number: &str) -> Result<()>;
}

/// NoopCheckpoint persists nothing, for consumers that always start from their configured
/// initial position.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCheckpoint;

impl CheckpointStore for NoopCheckpoint {
    async fn get(&self, _stream_name: &str, _shard_id: &str) -> Result<String> {
        Ok(String::new())
    }

    async fn set(&self, _stream_name: &str, _shard_id: &str, _sequence_number: &str) -> Result<()> {
        Ok(())
    }
}
