//! Query-result cache adapters.
//!
//! [`RedisResultCache`] is the production adapter: values live under plain
//! string keys with a sliding TTL, and invalidation removes keys by exact
//! name or by prefix scan. [`InMemoryCache`] backs tests and database-less
//! development with the same contract minus expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::{redis, RedisConnectionManager};

use crate::domain::ports::{CacheError, ResultCache};

/// Redis-backed result cache with sliding expiry.
#[derive(Clone)]
pub struct RedisResultCache {
    pool: Pool<RedisConnectionManager>,
    ttl: Duration,
}

impl RedisResultCache {
    /// Connect to Redis and build the cache with the given entry TTL.
    pub async fn connect(url: &str, ttl: Duration) -> Result<Self, CacheError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|err| CacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        Ok(Self { pool, ttl })
    }

    async fn conn(
        &self,
    ) -> Result<bb8_redis::bb8::PooledConnection<'_, RedisConnectionManager>, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }

    fn ttl_seconds(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }
}

#[async_trait]
impl ResultCache for RedisResultCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn().await?;
        // GETEX refreshes the TTL, giving hot entries a sliding window.
        redis::cmd("GETEX")
            .arg(key)
            .arg("EX")
            .arg(self.ttl_seconds())
            .query_async(&mut *conn)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, value, self.ttl_seconds())
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let pattern = format!("{}*", escape_match_pattern(prefix));
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut *conn)
                .await
                .map_err(|err| CacheError::backend(err.to_string()))?;
            if !keys.is_empty() {
                conn.del::<_, ()>(keys)
                    .await
                    .map_err(|err| CacheError::backend(err.to_string()))?;
            }
            if next == 0 {
                return Ok(());
            }
            cursor = next;
        }
    }
}

/// Escape glob metacharacters so a prefix matches literally under `MATCH`.
fn escape_match_pattern(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Map-backed cache for tests and database-less runs. Entries never expire.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::backend("cache state poisoned"))
    }
}

#[async_trait]
impl ResultCache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        self.lock()?.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}
