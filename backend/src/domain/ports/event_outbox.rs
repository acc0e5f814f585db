//! Port for transactional event publication.

use async_trait::async_trait;

use super::store::StoreError;
use crate::domain::events::DomainEvent;

/// Records events for later delivery.
///
/// Adapters write through the same session (and therefore the same
/// transaction) as the entity change, so the event row commits or rolls
/// back together with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventOutbox: Send + Sync {
    /// Queue an event for at-least-once delivery.
    async fn publish(&self, event: &DomainEvent) -> Result<(), StoreError>;
}

/// Fixture outbox that discards events.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventOutbox;

#[async_trait]
impl EventOutbox for FixtureEventOutbox {
    async fn publish(&self, _event: &DomainEvent) -> Result<(), StoreError> {
        Ok(())
    }
}
