//! Port for project persistence.

use async_trait::async_trait;
use pagination::PagedResult;

use super::store::StoreError;
use crate::domain::listing::ProjectQuery;
use crate::domain::project::{Project, ProjectId, UserId};

/// Durable storage for projects.
///
/// Deleting a project cascades to its tasks at the store level, and the
/// store enforces `(owner_id, name)` uniqueness with a unique index in
/// addition to the handler pre-check through [`name_taken`].
///
/// [`name_taken`]: ProjectRepository::name_taken
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Fetch one project, `None` when it does not exist.
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Whether `owner` already has a project called `name`, optionally
    /// excluding one id (for rename checks).
    async fn name_taken(
        &self,
        owner: &UserId,
        name: &str,
        exclude: Option<ProjectId>,
    ) -> Result<bool, StoreError>;

    /// Insert a new project.
    async fn insert(&self, project: &Project) -> Result<(), StoreError>;

    /// Persist changes to an existing project.
    async fn update(&self, project: &Project) -> Result<(), StoreError>;

    /// Delete a project; its tasks go with it.
    async fn delete(&self, id: ProjectId) -> Result<(), StoreError>;

    /// One page of projects matching the specification, with the total
    /// matching count.
    async fn list(&self, query: &ProjectQuery) -> Result<PagedResult<Project>, StoreError>;
}
