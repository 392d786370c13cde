//! In-process cache backend: a TTL map behind an async `RwLock`.
//!
//! Fills the [`CacheStore`] contract for tests and single-process
//! deployments. Expired entries are dropped lazily on read; there is no
//! background sweeper.

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::CacheStore;
use crate::error::Result;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // The entry is expired; drop it under the write lock.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);

        cache.set("k", "[1]", ttl).await.expect("set");
        assert_eq!(cache.get("k").await.expect("get"), Some("[1]".to_string()));
        assert!(cache.exists("k").await.expect("exists"));

        cache.delete("k").await.expect("delete");
        assert_eq!(cache.get("k").await.expect("get"), None);
        assert!(!cache.exists("k").await.expect("exists"));
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("k", "{}", Duration::from_secs(5))
            .await
            .expect("set");

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(cache.exists("k").await.expect("still live"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await.expect("expired"), None);
    }

    #[tokio::test]
    async fn overwrite_replaces_value_and_ttl() {
        let cache = MemoryCache::new();
        cache.set("k", "[1]", Duration::from_secs(5)).await.expect("set");
        cache.set("k", "[2]", Duration::from_secs(60)).await.expect("set");
        assert_eq!(cache.get("k").await.expect("get"), Some("[2]".to_string()));
    }
}
