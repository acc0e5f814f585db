//! Driving port for project mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::project::ProjectView;
use crate::domain::projects::{CreateProject, DeleteProject, UpdateProject};

/// Project command use cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectCommands: Send + Sync {
    /// Create a project for the acting user.
    async fn create_project(&self, request: CreateProject) -> Result<ProjectView, Error>;

    /// Update a project's name and description.
    async fn update_project(&self, request: UpdateProject) -> Result<ProjectView, Error>;

    /// Delete a project and all of its tasks.
    async fn delete_project(&self, request: DeleteProject) -> Result<(), Error>;
}
