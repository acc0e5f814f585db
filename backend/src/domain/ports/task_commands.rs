//! Driving port for task mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::task::TaskView;
use crate::domain::tasks::{CreateTask, DeleteTask, UpdateTask};

/// Task command use cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommands: Send + Sync {
    /// Create a task under a project the actor may modify.
    async fn create_task(&self, request: CreateTask) -> Result<TaskView, Error>;

    /// Update a task's title, description, and status.
    async fn update_task(&self, request: UpdateTask) -> Result<TaskView, Error>;

    /// Delete a task.
    async fn delete_task(&self, request: DeleteTask) -> Result<(), Error>;
}
