//! Port the background dispatcher drains the outbox through.

use async_trait::async_trait;

use super::store::StoreError;

/// A persisted, not-yet-delivered event row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxRecord {
    /// Monotonic row id; rows are delivered in id order.
    pub id: i64,
    /// Topic to publish on.
    pub topic: String,
    /// Serialized event payload.
    pub payload: String,
}

/// Read side of the outbox, used only by the dispatcher.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Oldest undelivered rows, at most `limit` of them, in insertion order.
    async fn fetch_undelivered(&self, limit: u32) -> Result<Vec<OutboxRecord>, StoreError>;

    /// Mark one row delivered. Called after a successful publish, so a
    /// crash in between yields redelivery rather than loss.
    async fn mark_delivered(&self, id: i64) -> Result<(), StoreError>;
}
