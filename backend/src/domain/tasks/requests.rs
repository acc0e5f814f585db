//! Task use-case requests and their validation rules.

use pagination::PagedResult;

use crate::domain::actor::Actor;
use crate::domain::error::FieldViolation;
use crate::domain::listing::ListParams;
use crate::domain::pipeline::Request;
use crate::domain::project::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN, ProjectId};
use crate::domain::task::{TaskId, TaskStatus, TaskView};

pub(super) const STATUS_MESSAGE: &str = "Status must be one of todo, inProgress, done.";

fn check_title(title: &str, violations: &mut Vec<FieldViolation>) {
    if title.trim().is_empty() {
        violations.push(FieldViolation::new("title", "Task title is required."));
    } else if title.chars().count() > NAME_MAX_LEN {
        violations.push(FieldViolation::new(
            "title",
            format!("Task title must not exceed {NAME_MAX_LEN} characters."),
        ));
    }
}

fn check_description(description: Option<&str>, violations: &mut Vec<FieldViolation>) {
    if let Some(text) = description {
        if text.chars().count() > DESCRIPTION_MAX_LEN {
            violations.push(FieldViolation::new(
                "description",
                format!("Description must not exceed {DESCRIPTION_MAX_LEN} characters."),
            ));
        }
    }
}

fn check_status(status: &str, violations: &mut Vec<FieldViolation>) {
    if TaskStatus::parse(status).is_none() {
        violations.push(FieldViolation::new("status", STATUS_MESSAGE));
    }
}

/// Create a task under a project.
///
/// `status` stays raw here so an unknown value is reported alongside any
/// other violations instead of failing body deserialization on its own.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Acting caller; must own the parent project or be an admin.
    pub actor: Actor,
    /// Parent project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Requested workflow state, unparsed.
    pub status: String,
}

impl Request for CreateTask {
    type Output = TaskView;
    const NAME: &'static str = "create_task";
    const MUTATING: bool = true;

    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        check_title(&self.title, &mut violations);
        check_description(self.description.as_deref(), &mut violations);
        check_status(&self.status, &mut violations);
        violations
    }
}

/// Replace a task's title, description, and status.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    /// Acting caller.
    pub actor: Actor,
    /// Task to update.
    pub id: TaskId,
    /// New title.
    pub title: String,
    /// New description; `None` clears it.
    pub description: Option<String>,
    /// Requested workflow state, unparsed.
    pub status: String,
}

impl Request for UpdateTask {
    type Output = TaskView;
    const NAME: &'static str = "update_task";
    const MUTATING: bool = true;

    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        check_title(&self.title, &mut violations);
        check_description(self.description.as_deref(), &mut violations);
        check_status(&self.status, &mut violations);
        violations
    }
}

/// Delete a task.
#[derive(Debug, Clone)]
pub struct DeleteTask {
    /// Acting caller.
    pub actor: Actor,
    /// Task to delete.
    pub id: TaskId,
}

impl Request for DeleteTask {
    type Output = ();
    const NAME: &'static str = "delete_task";
    const MUTATING: bool = true;
}

/// Fetch one task.
#[derive(Debug, Clone)]
pub struct GetTaskById {
    /// Acting caller.
    pub actor: Actor,
    /// Task to fetch.
    pub id: TaskId,
}

impl Request for GetTaskById {
    type Output = TaskView;
    const NAME: &'static str = "get_task_by_id";
    const MUTATING: bool = false;
}

/// List one project's tasks.
#[derive(Debug, Clone)]
pub struct ListTasks {
    /// Acting caller; must own the parent project or be an admin.
    pub actor: Actor,
    /// Parent project.
    pub project_id: ProjectId,
    /// Paging, search, and sort parameters as sent.
    pub params: ListParams,
}

impl Request for ListTasks {
    type Output = PagedResult<TaskView>;
    const NAME: &'static str = "list_tasks";
    const MUTATING: bool = false;

    fn validate(&self) -> Vec<FieldViolation> {
        self.params.violations()
    }
}
