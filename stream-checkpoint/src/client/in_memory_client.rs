//! In-memory implementation of the [Client] trait for tests and single process deployments.
//! Values live only as long as the process, so checkpoints do not survive a restart.

use crate::client::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// InMemoryClient keeps values in a map shared by all of its clones.
#[derive(Clone, Default)]
pub struct InMemoryClient {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
}

struct Entry {
    value: String,
    /// None means the entry never expires.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.lock().values().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // a panic while holding the lock cannot leave the map half written, so poisoning is ignored
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Client for InMemoryClient {
    async fn get(&self, key: &str) -> crate::Result<Option<String>> {
        let mut inner = self.lock();

        match inner.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                inner.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> crate::Result<()> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn ping(&self) -> crate::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let client = InMemoryClient::new();
        assert_eq!(client.get("nope").await.unwrap(), None);
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let client = InMemoryClient::new();
        client.set("k", "v1", None).await.unwrap();
        assert_eq!(client.get("k").await.unwrap(), Some("v1".to_string()));

        // overwrite
        client.set("k", "v2", None).await.unwrap();
        assert_eq!(client.get("k").await.unwrap(), Some("v2".to_string()));
        assert_eq!(client.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let client = InMemoryClient::new();
        let other = client.clone();

        client.set("k", "v", None).await.unwrap();
        assert_eq!(other.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let client = InMemoryClient::new();
        client
            .set("short", "v", Some(Duration::from_millis(50)))
            .await
            .unwrap();
        client.set("forever", "v", None).await.unwrap();

        assert_eq!(client.get("short").await.unwrap(), Some("v".to_string()));

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(client.get("short").await.unwrap(), None);
        assert_eq!(client.get("forever").await.unwrap(), Some("v".to_string()));
        assert_eq!(client.len(), 1);
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(InMemoryClient::new().ping().await.is_ok());
    }
}
