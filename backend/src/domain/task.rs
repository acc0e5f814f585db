//! Task entity and its public projection.
//!
//! A task belongs to exactly one project and carries no owner of its own;
//! authorization always derives from the parent project's owner.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::ProjectId;

/// Opaque unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
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

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Canonical name used in storage and sort comparisons.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Parse a status name. Lenient on case and the in-progress separator
    /// so both the storage name and the JSON spelling are accepted.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "in_progress" | "inprogress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier, generated server-side at creation.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Workflow state.
    pub status: TaskStatus,
    /// Parent project.
    pub project_id: ProjectId,
}

impl Task {
    /// Assemble a new task with a freshly generated identifier.
    pub fn create(
        project_id: ProjectId,
        title: String,
        description: Option<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: TaskId::random(),
            title,
            description,
            status,
            project_id,
        }
    }
}

/// Public projection of a [`Task`], cache-serialisable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow state.
    pub status: TaskStatus,
    /// Parent project identifier.
    pub project_id: ProjectId,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            project_id: task.project_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskStatus::Todo, "todo")]
    #[case(TaskStatus::InProgress, "in_progress")]
    #[case(TaskStatus::Done, "done")]
    fn status_names_round_trip(#[case] status: TaskStatus, #[case] name: &str) {
        assert_eq!(status.as_str(), name);
        assert_eq!(TaskStatus::parse(name), Some(status));
    }

    #[rstest]
    fn unknown_status_name_is_rejected() {
        assert_eq!(TaskStatus::parse("blocked"), None);
    }

    #[rstest]
    fn json_spelling_of_in_progress_is_accepted() {
        assert_eq!(TaskStatus::parse("inProgress"), Some(TaskStatus::InProgress));
    }

    #[rstest]
    fn status_serialises_as_camel_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"inProgress\"");
    }
}
