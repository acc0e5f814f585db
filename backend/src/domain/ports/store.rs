//! Shared store error taxonomy and the per-request store session.
//!
//! Every persistence-facing port reports [`StoreError`] so the retry policy
//! can classify transience in one place. A [`StoreFactory`] opens one
//! [`StoreSession`] per request; the session's repositories, outbox, and
//! unit of work share a single underlying connection, so `begin`/`commit`
//! on the unit of work covers every write the handler issues.

use std::sync::Arc;

use async_trait::async_trait;

use super::define_port_error;
use super::event_outbox::EventOutbox;
use super::project_repository::ProjectRepository;
use super::task_repository::TaskRepository;
use super::unit_of_work::UnitOfWork;
use crate::domain::error::Error;

define_port_error! {
    /// Errors raised by persistence adapters.
    pub enum StoreError {
        /// A connection could not be established or checked out.
        Connection { message: String } => "store connection failed: {message}",
        /// A query or mutation failed for a non-retryable reason.
        Query { message: String } => "store query failed: {message}",
        /// A retryable failure: serialization conflict, dropped connection,
        /// or timeout.
        Transient { message: String } => "transient store failure: {message}",
        /// A unique index rejected the write.
        UniqueViolation { message: String } => "unique constraint violated: {message}",
    }
}

impl StoreError {
    /// Whether the retry policy should try this operation again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { message } => Error::conflict(message),
            other => Error::internal(other.to_string()),
        }
    }
}

/// One request's view of the store: repositories, outbox, and the unit of
/// work, all bound to the same underlying connection.
#[derive(Clone)]
pub struct StoreSession {
    /// Project persistence.
    pub projects: Arc<dyn ProjectRepository>,
    /// Task persistence.
    pub tasks: Arc<dyn TaskRepository>,
    /// Transactional event outbox.
    pub outbox: Arc<dyn EventOutbox>,
    /// Transaction control over the shared connection.
    pub unit_of_work: Arc<dyn UnitOfWork>,
}

/// Opens a fresh [`StoreSession`] per request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Open a session; the connection is checked out lazily on first use.
    async fn open(&self) -> Result<StoreSession, StoreError>;
}
