//! Cache-aside helpers shared by the query and command handlers.
//!
//! The cache is never authoritative, so nothing here returns an error:
//! unreadable entries and backend failures degrade to a miss on the read
//! side, and invalidation failures are logged and swallowed because a
//! stale entry is bounded by the TTL while failing a committed command
//! would lose work.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ports::ResultCache;

/// Read and deserialize a cached value, treating any failure as a miss.
pub(crate) async fn read<T: DeserializeOwned>(cache: &dyn ResultCache, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(key, error = %error, "discarding unreadable cache entry");
                None
            }
        },
        Ok(None) => None,
        Err(error) => {
            tracing::warn!(key, error = %error, "cache read failed");
            None
        }
    }
}

/// Serialize and store a value, best-effort.
pub(crate) async fn write<T: Serialize>(cache: &dyn ResultCache, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            if let Err(error) = cache.put(key, &json).await {
                tracing::warn!(key, error = %error, "cache write failed");
            }
        }
        Err(error) => {
            tracing::warn!(key, error = %error, "cache value could not be serialized");
        }
    }
}

/// Remove one exact key, best-effort.
pub(crate) async fn remove_key(cache: &dyn ResultCache, key: &str) {
    if let Err(error) = cache.remove(key).await {
        tracing::warn!(key, error = %error, "cache invalidation failed");
    }
}

/// Remove every key under a prefix, best-effort.
pub(crate) async fn remove_prefix(cache: &dyn ResultCache, prefix: &str) {
    if let Err(error) = cache.remove_prefix(prefix).await {
        tracing::warn!(prefix, error = %error, "cache invalidation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CacheError, MockResultCache};

    #[tokio::test]
    async fn backend_failures_read_as_misses() {
        let mut cache = MockResultCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Err(CacheError::backend("down")));

        let value: Option<u32> = read(&cache, "some_key").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn corrupt_entries_read_as_misses() {
        let mut cache = MockResultCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some("not json".to_owned())));

        let value: Option<u32> = read(&cache, "some_key").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn invalidation_failures_are_swallowed() {
        let mut cache = MockResultCache::new();
        cache
            .expect_remove()
            .times(1)
            .returning(|_| Err(CacheError::backend("down")));
        cache
            .expect_remove_prefix()
            .times(1)
            .returning(|_| Err(CacheError::backend("down")));

        remove_key(&cache, "project_x").await;
        remove_prefix(&cache, "projects_all").await;
    }
}
