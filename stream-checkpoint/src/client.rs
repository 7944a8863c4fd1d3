use std::time::Duration;

pub mod in_memory_client;
pub mod redis_client;

/// Client is the key-value capability a [crate::Checkpoint] persists through. Implementations
/// are cheap handles to a shared backend, cloning one must not open a new backend.
#[trait_variant::make(Send)]
pub trait Client: Clone + 'static {
    /// Get the value stored under `key`. `Ok(None)` means the key does not exist.
    async fn get(&self, key: &str) -> crate::Result<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value. A `ttl` of `None` keeps the
    /// value forever.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> crate::Result<()>;

    /// Liveness probe, succeeds only if the backend can serve requests.
    async fn ping(&self) -> crate::Result<()>;
}
