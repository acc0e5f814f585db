//! Event bus adapter publishing over Redis pub/sub.

use async_trait::async_trait;
use bb8_redis::bb8::Pool;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::RedisConnectionManager;

use crate::domain::ports::{EventBus, EventBusError};

/// Publishes serialized domain events on Redis channels named after topics.
#[derive(Clone)]
pub struct RedisEventBus {
    pool: Pool<RedisConnectionManager>,
}

impl RedisEventBus {
    /// Connect to Redis and build the bus.
    pub async fn connect(url: &str) -> Result<Self, EventBusError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|err| EventBusError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| EventBusError::backend(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl EventBus for RedisEventBus {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), EventBusError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| EventBusError::backend(err.to_string()))?;
        conn.publish::<_, _, ()>(topic, payload)
            .await
            .map_err(|err| EventBusError::backend(err.to_string()))
    }
}
