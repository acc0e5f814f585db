//! Transaction control over the request session's connection.

use async_trait::async_trait;
use diesel_async::{AnsiTransactionManager, TransactionManager};

use super::helpers::map_diesel_error;
use super::session::DbSession;
use crate::domain::ports::{StoreError, UnitOfWork};

/// Explicit `BEGIN`/`COMMIT`/`ROLLBACK` on the shared session connection.
///
/// Because every repository built from the same [`DbSession`] writes
/// through that one connection, these boundaries cover all of a handler's
/// statements.
#[derive(Clone)]
pub struct DieselUnitOfWork {
    session: DbSession,
}

impl DieselUnitOfWork {
    /// Build the adapter over a shared session.
    pub fn new(session: DbSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UnitOfWork for DieselUnitOfWork {
    async fn begin(&self) -> Result<(), StoreError> {
        let mut conn = self.session.conn().await?;
        AnsiTransactionManager::begin_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn commit(&self) -> Result<(), StoreError> {
        let mut conn = self.session.conn().await?;
        AnsiTransactionManager::commit_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn rollback(&self) -> Result<(), StoreError> {
        let mut conn = self.session.conn().await?;
        AnsiTransactionManager::rollback_transaction(&mut *conn)
            .await
            .map_err(map_diesel_error)
    }
}
