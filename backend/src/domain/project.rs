//! Project aggregate and its public projection.
//!
//! ## Invariants
//! - `name` is non-empty and at most [`NAME_MAX_LEN`] characters.
//! - `description`, when present, is at most [`DESCRIPTION_MAX_LEN`]
//!   characters.
//! - `(owner_id, name)` is unique per tenant; the store enforces this with a
//!   unique index, handlers pre-check it for a friendlier error.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a project name or task title.
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length of a project or task description.
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Opaque unique project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of the user owning a resource, taken from the identity
/// provider's subject claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a subject identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A project owned by a single user, parent of zero or more tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Unique identifier, generated server-side at creation.
    pub id: ProjectId,
    /// Display name, unique per owner.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Owner's subject identifier.
    pub owner_id: UserId,
}

impl Project {
    /// Assemble a new project with a freshly generated identifier.
    pub fn create(owner_id: UserId, name: String, description: Option<String>) -> Self {
        Self {
            id: ProjectId::random(),
            name,
            description,
            owner_id,
        }
    }
}

/// Public projection of a [`Project`] returned by queries and commands.
///
/// Serialisable so query results can be stored in the distributed cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    /// Project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Owner's subject identifier.
    pub owner_id: UserId,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            owner_id: project.owner_id,
        }
    }
}
