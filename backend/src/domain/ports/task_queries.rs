//! Driving port for task reads.

use async_trait::async_trait;
use pagination::PagedResult;

use crate::domain::error::Error;
use crate::domain::task::TaskView;
use crate::domain::tasks::{GetTaskById, ListTasks};

/// Task query use cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskQueries: Send + Sync {
    /// Fetch one task the actor may see.
    async fn get_task(&self, request: GetTaskById) -> Result<TaskView, Error>;

    /// List one project's tasks, paged and filtered.
    async fn list_tasks(&self, request: ListTasks) -> Result<PagedResult<TaskView>, Error>;
}
