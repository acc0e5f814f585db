//! Port for task persistence.

use async_trait::async_trait;
use pagination::PagedResult;

use super::store::StoreError;
use crate::domain::listing::TaskQuery;
use crate::domain::task::{Task, TaskId};

/// Durable storage for tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Fetch one task, `None` when it does not exist.
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Insert a new task.
    async fn insert(&self, task: &Task) -> Result<(), StoreError>;

    /// Persist changes to an existing task.
    async fn update(&self, task: &Task) -> Result<(), StoreError>;

    /// Delete a task.
    async fn delete(&self, id: TaskId) -> Result<(), StoreError>;

    /// One page of a project's tasks matching the specification.
    async fn list(&self, query: &TaskQuery) -> Result<PagedResult<Task>, StoreError>;
}
