//! Outbox dispatcher: relays stored events to the bus.
//!
//! Runs as a background loop beside the HTTP server. Each tick loads a
//! batch of undelivered rows in insertion order, publishes them, and marks
//! each row delivered only after its publish succeeds. A failed publish
//! ends the tick so later events never overtake earlier ones; a crash
//! between publish and mark means redelivery, which is the at-least-once
//! contract consumers must handle.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::ports::{EventBus, OutboxStore, StoreError};

/// Rows fetched per tick.
pub const DEFAULT_BATCH_SIZE: u32 = 50;

/// Background relay from the outbox table to the event bus.
pub struct OutboxDispatcher {
    store: Arc<dyn OutboxStore>,
    bus: Arc<dyn EventBus>,
    poll_interval: Duration,
    batch_size: u32,
}

impl OutboxDispatcher {
    /// Build a dispatcher polling at the given interval.
    pub fn new(store: Arc<dyn OutboxStore>, bus: Arc<dyn EventBus>, poll_interval: Duration) -> Self {
        Self {
            store,
            bus,
            poll_interval,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Deliver one batch, returning how many events were published and
    /// marked. Publish failures end the batch early so delivery order is
    /// preserved; the remaining rows are retried on the next tick.
    pub async fn tick(&self) -> Result<usize, StoreError> {
        let pending = self.store.fetch_undelivered(self.batch_size).await?;
        let mut delivered = 0;
        for record in pending {
            if let Err(error) = self.bus.publish(&record.topic, &record.payload).await {
                warn!(
                    outbox_id = record.id,
                    topic = %record.topic,
                    %error,
                    "event publish failed, batch suspended until next poll"
                );
                break;
            }
            self.store.mark_delivered(record.id).await?;
            delivered += 1;
        }
        if delivered > 0 {
            debug!(delivered, "outbox batch delivered");
        }
        Ok(delivered)
    }

    /// Poll forever. Errors are logged and the loop keeps going; the
    /// undelivered rows stay in the outbox until a tick succeeds.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(error) = self.tick().await {
                warn!(%error, "outbox poll failed");
            }
        }
    }
}
