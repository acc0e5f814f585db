//! Port for the distributed query-result cache.
//!
//! Values are serialized views keyed by the `domain::cache_keys` namespace.
//! The cache is never authoritative: reads fall back to the store on miss
//! or error, and writers invalidate rather than update.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by cache adapters.
    pub enum CacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "cache backend failure: {message}",
        /// Cached content could not be read back.
        Serialization { message: String } => "cache serialisation failed: {message}",
    }
}

/// String-keyed result cache with sliding expiry and prefix invalidation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Read a value, refreshing its sliding TTL on hit.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value under the key with the configured TTL.
    async fn put(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove one exact key; absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every key starting with the prefix.
    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError>;
}

/// Fixture cache that always misses and discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResultCache;

#[async_trait]
impl ResultCache for FixtureResultCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove_prefix(&self, _prefix: &str) -> Result<(), CacheError> {
        Ok(())
    }
}
