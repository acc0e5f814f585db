//! Driving port for project reads.

use async_trait::async_trait;
use pagination::PagedResult;

use crate::domain::error::Error;
use crate::domain::project::ProjectView;
use crate::domain::projects::{GetProjectById, ListProjects};

/// Project query use cases exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectQueries: Send + Sync {
    /// Fetch one project the actor may see.
    async fn get_project(&self, request: GetProjectById) -> Result<ProjectView, Error>;

    /// List projects visible to the actor, paged and filtered.
    async fn list_projects(
        &self,
        request: ListProjects,
    ) -> Result<PagedResult<ProjectView>, Error>;
}
