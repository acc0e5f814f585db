//! Builds one diesel-backed store session per request.

use std::sync::Arc;

use async_trait::async_trait;

use super::diesel_outbox::DieselEventOutbox;
use super::diesel_project_repository::DieselProjectRepository;
use super::diesel_task_repository::DieselTaskRepository;
use super::diesel_unit_of_work::DieselUnitOfWork;
use super::pool::DbPool;
use super::session::DbSession;
use crate::domain::ports::{StoreError, StoreFactory, StoreSession};

/// Factory handing out sessions whose adapters share one connection.
#[derive(Clone)]
pub struct DieselStoreFactory {
    pool: DbPool,
}

impl DieselStoreFactory {
    /// Build the factory over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreFactory for DieselStoreFactory {
    async fn open(&self) -> Result<StoreSession, StoreError> {
        let session = DbSession::new(self.pool.clone());
        Ok(StoreSession {
            projects: Arc::new(DieselProjectRepository::new(session.clone())),
            tasks: Arc::new(DieselTaskRepository::new(session.clone())),
            outbox: Arc::new(DieselEventOutbox::new(session.clone())),
            unit_of_work: Arc::new(DieselUnitOfWork::new(session)),
        })
    }
}
