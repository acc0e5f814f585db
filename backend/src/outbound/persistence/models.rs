//! Row types bridging Diesel and the domain entities.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{outbox_events, projects, tasks};
use crate::domain::ports::OutboxRecord;
use crate::domain::project::{Project, ProjectId, UserId};
use crate::domain::task::{Task, TaskId, TaskStatus};

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: ProjectId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            owner_id: UserId::new(row.owner_id),
        }
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub struct ProjectChangeset<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub owner_id: &'a str,
}

impl<'a> ProjectChangeset<'a> {
    pub fn from_project(project: &'a Project) -> Self {
        Self {
            id: *project.id.as_uuid(),
            name: &project.name,
            description: project.description.as_deref(),
            owner_id: project.owner_id.as_str(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub project_id: Uuid,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        let status = TaskStatus::parse(&row.status).unwrap_or_else(|| {
            tracing::warn!(
                value = row.status,
                task_id = %row.id,
                "unrecognised task status in storage, defaulting to todo"
            );
            TaskStatus::Todo
        });
        Self {
            id: TaskId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            status,
            project_id: ProjectId::from_uuid(row.project_id),
        }
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub project_id: Uuid,
}

impl<'a> TaskChangeset<'a> {
    pub fn from_task(task: &'a Task) -> Self {
        Self {
            id: *task.id.as_uuid(),
            title: &task.title,
            description: task.description.as_deref(),
            status: task.status.as_str(),
            project_id: *task.project_id.as_uuid(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = outbox_events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxRow {
    pub id: i64,
    pub topic: String,
    pub payload: String,
}

impl From<OutboxRow> for OutboxRecord {
    fn from(row: OutboxRow) -> Self {
        Self {
            id: row.id,
            topic: row.topic,
            payload: row.payload,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = outbox_events)]
pub struct NewOutboxRow<'a> {
    pub topic: &'a str,
    pub payload: &'a str,
}
