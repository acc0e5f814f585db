//! Transaction control port.

use async_trait::async_trait;

use super::store::StoreError;

/// Explicit transaction boundaries over the session's shared connection.
///
/// The pipeline's transaction behavior calls `begin` before a mutating
/// handler runs, `commit` when it succeeds, and `rollback` when it fails.
/// Queries never touch the unit of work.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Start a transaction.
    async fn begin(&self) -> Result<(), StoreError>;
    /// Commit the open transaction.
    async fn commit(&self) -> Result<(), StoreError>;
    /// Roll the open transaction back.
    async fn rollback(&self) -> Result<(), StoreError>;
}

/// No-op unit of work for tests that do not exercise transactions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUnitOfWork;

#[async_trait]
impl UnitOfWork for FixtureUnitOfWork {
    async fn begin(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn rollback(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
