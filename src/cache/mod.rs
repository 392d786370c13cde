//! Cache backend contract and the JSON value layer on top of it.
//!
//! The backend stores opaque JSON text under string keys with a TTL. The
//! helper layer enforces the value contract: only payloads that serialize
//! to a JSON object or array may be stored, so a bare string, number or
//! `null` never lands in the cache.

pub mod memory;

pub use memory::MemoryCache;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{Result, ScrapeError};

/// Capability interface over the cache backend. The shipped
/// implementation is [`MemoryCache`]; a networked backend (Valkey, Redis)
/// satisfies the same contract without touching the service layer.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored JSON text, or `None` when the key is absent or
    /// expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores JSON text under `key` for `ttl`. Every write carries a
    /// positive TTL; nothing persists forever.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool>;
}

/// Reads and decodes a cached value. Absent keys yield `Ok(None)`; a
/// present value that fails to decode is an error (the stored bytes are
/// corrupt, not merely missing).
pub async fn get_json<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw)
        .map_err(|err| ScrapeError::Cache(format!("undecodable value for '{key}': {err}")))?;
    Ok(Some(value))
}

/// Serializes and stores a value. Rejects payloads whose JSON form is not
/// an object or array.
pub async fn set_json<T: Serialize>(
    store: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<()> {
    let raw = serde_json::to_string(value)
        .map_err(|err| ScrapeError::Cache(format!("unserializable value for '{key}': {err}")))?;

    if !raw.trim_start().starts_with(['{', '[']) {
        return Err(ScrapeError::Cache(format!(
            "refusing to cache non-object/array value for '{key}'"
        )));
    }

    store.set(key, &raw, ttl).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scalar_payloads_are_rejected() {
        let store = MemoryCache::new();
        let err = set_json(&store, "k", &42_u32, Duration::from_secs(60))
            .await
            .expect_err("a bare number is not an object or array");
        assert!(matches!(err, ScrapeError::Cache(_)));

        let err = set_json(&store, "k", &"hello", Duration::from_secs(60))
            .await
            .expect_err("a bare string is not an object or array");
        assert!(matches!(err, ScrapeError::Cache(_)));
    }

    #[tokio::test]
    async fn object_and_array_payloads_round_trip() {
        let store = MemoryCache::new();
        let ttl = Duration::from_secs(60);

        set_json(&store, "list", &vec![1, 2, 3], ttl).await.expect("store array");
        let list: Option<Vec<i32>> = get_json(&store, "list").await.expect("read array");
        assert_eq!(list, Some(vec![1, 2, 3]));

        let absent: Option<Vec<i32>> = get_json(&store, "missing").await.expect("absent key");
        assert_eq!(absent, None);
    }
}
