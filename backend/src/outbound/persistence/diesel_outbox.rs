//! PostgreSQL-backed outbox adapters.
//!
//! [`DieselEventOutbox`] writes through the request session, so the event
//! row joins the entity change's transaction. [`DieselOutboxStore`] is the
//! dispatcher's read side and uses the pool directly: delivery runs
//! outside any request.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::helpers::map_diesel_error;
use super::models::{NewOutboxRow, OutboxRow};
use super::pool::DbPool;
use super::retry::with_retries;
use super::schema::outbox_events;
use super::session::DbSession;
use crate::domain::events::DomainEvent;
use crate::domain::ports::{EventOutbox, OutboxRecord, OutboxStore, StoreError};

/// Transactional outbox writer bound to a request session.
#[derive(Clone)]
pub struct DieselEventOutbox {
    session: DbSession,
}

impl DieselEventOutbox {
    /// Build the adapter over a shared session.
    pub fn new(session: DbSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl EventOutbox for DieselEventOutbox {
    async fn publish(&self, event: &DomainEvent) -> Result<(), StoreError> {
        let payload = serde_json::to_string(event)
            .map_err(|err| StoreError::query(format!("event not serializable: {err}")))?;
        let topic = event.topic();

        let session = self.session.clone();
        let payload = payload.as_str();
        with_retries("outbox.publish", || {
            let session = session.clone();
            async move {
                let mut conn = session.conn().await?;
                diesel::insert_into(outbox_events::table)
                    .values(NewOutboxRow { topic, payload })
                    .execute(&mut *conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }
        })
        .await
    }
}

/// Dispatcher-facing outbox reader over its own pool connections.
#[derive(Clone)]
pub struct DieselOutboxStore {
    pool: DbPool,
}

impl DieselOutboxStore {
    /// Build the adapter over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutboxStore for DieselOutboxStore {
    async fn fetch_undelivered(&self, limit: u32) -> Result<Vec<OutboxRecord>, StoreError> {
        let mut conn = self
            .pool
            .get_owned()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;

        let rows: Vec<OutboxRow> = outbox_events::table
            .filter(outbox_events::delivered.eq(false))
            .order(outbox_events::id.asc())
            .limit(i64::from(limit))
            .select(OutboxRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(OutboxRecord::from).collect())
    }

    async fn mark_delivered(&self, id: i64) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .get_owned()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;

        diesel::update(outbox_events::table.find(id))
            .set(outbox_events::delivered.eq(true))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
