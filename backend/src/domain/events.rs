//! Domain events emitted by commands.
//!
//! Events are flat immutable records written to the outbox inside the same
//! transaction as the entity change, then delivered at-least-once by the
//! background dispatcher. Consumers must tolerate redelivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::project::{ProjectId, UserId};
use super::task::{TaskId, TaskStatus};

/// One domain event per entity lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DomainEvent {
    /// A project was created.
    ProjectCreated {
        /// Identifier of the new project.
        project_id: ProjectId,
        /// Project name at creation time.
        name: String,
        /// Owning user.
        owner_id: UserId,
        /// When the command ran, UTC.
        occurred_at: DateTime<Utc>,
    },
    /// A project's name or description changed.
    ProjectUpdated {
        /// Identifier of the changed project.
        project_id: ProjectId,
        /// Name after the update.
        name: String,
        /// Owning user.
        owner_id: UserId,
        /// When the command ran, UTC.
        occurred_at: DateTime<Utc>,
    },
    /// A project (and its tasks) was deleted.
    ProjectDeleted {
        /// Identifier of the deleted project.
        project_id: ProjectId,
        /// Owning user.
        owner_id: UserId,
        /// When the command ran, UTC.
        occurred_at: DateTime<Utc>,
    },
    /// A task was created.
    TaskCreated {
        /// Identifier of the new task.
        task_id: TaskId,
        /// Parent project.
        project_id: ProjectId,
        /// Task title at creation time.
        title: String,
        /// When the command ran, UTC.
        occurred_at: DateTime<Utc>,
    },
    /// A task's title, description, or status changed.
    TaskUpdated {
        /// Identifier of the changed task.
        task_id: TaskId,
        /// Parent project.
        project_id: ProjectId,
        /// Title after the update.
        title: String,
        /// Status after the update.
        status: TaskStatus,
        /// When the command ran, UTC.
        occurred_at: DateTime<Utc>,
    },
    /// A task was deleted.
    TaskDeleted {
        /// Identifier of the deleted task.
        task_id: TaskId,
        /// Parent project.
        project_id: ProjectId,
        /// When the command ran, UTC.
        occurred_at: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Topic the event is published on, one per event type.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::ProjectCreated { .. } => "projects.created",
            Self::ProjectUpdated { .. } => "projects.updated",
            Self::ProjectDeleted { .. } => "projects.deleted",
            Self::TaskCreated { .. } => "tasks.created",
            Self::TaskUpdated { .. } => "tasks.updated",
            Self::TaskDeleted { .. } => "tasks.deleted",
        }
    }
}
