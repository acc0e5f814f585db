//! Port for the outbound event channel.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by event bus adapters.
    pub enum EventBusError {
        /// Broker is unavailable or rejected the publish.
        Backend { message: String } => "event bus failure: {message}",
    }
}

/// Fire-and-forget publish channel the dispatcher feeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a serialized event on a topic.
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), EventBusError>;
}

/// Fixture bus that accepts and drops every publish.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventBus;

#[async_trait]
impl EventBus for FixtureEventBus {
    async fn publish(&self, _topic: &str, _payload: &str) -> Result<(), EventBusError> {
        Ok(())
    }
}
