//! Task use-case handlers.
//!
//! Tasks carry no owner of their own, so every access check loads the
//! parent project first. Task writes invalidate the parent project's
//! cached entries too: its summaries may reflect task state, and breadth
//! here is cheaper than a coherence bug.

use async_trait::async_trait;
use chrono::Utc;
use pagination::PagedResult;

use super::requests::{
    CreateTask, DeleteTask, GetTaskById, ListTasks, STATUS_MESSAGE, UpdateTask,
};
use crate::domain::access::ensure_can_access;
use crate::domain::cache_keys;
use crate::domain::caching;
use crate::domain::error::{Error, FieldViolation};
use crate::domain::events::DomainEvent;
use crate::domain::listing::{TaskQuery, TaskSortField};
use crate::domain::pipeline::Handler;
use crate::domain::ports::{ResultCache, StoreSession};
use crate::domain::project::{Project, ProjectId, UserId};
use crate::domain::task::{Task, TaskStatus, TaskView};

const TASK_NOT_FOUND: &str = "Task not found.";
const PROJECT_NOT_FOUND: &str = "Project not found.";
const FORBIDDEN: &str = "You do not have access to this project.";

fn parse_status(raw: &str) -> Result<TaskStatus, Error> {
    TaskStatus::parse(raw)
        .ok_or_else(|| Error::validation(vec![FieldViolation::new("status", STATUS_MESSAGE)]))
}

async fn load_parent(store: &StoreSession, project_id: ProjectId) -> Result<Project, Error> {
    store
        .projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| Error::not_found(PROJECT_NOT_FOUND))
}

async fn invalidate_task_lists(cache: &dyn ResultCache, project_id: ProjectId, owner: &UserId) {
    caching::remove_prefix(cache, &cache_keys::tasks_project_prefix(project_id)).await;
    caching::remove_key(cache, &cache_keys::project_key(project_id)).await;
    caching::remove_prefix(cache, &cache_keys::projects_user_prefix(owner)).await;
    caching::remove_prefix(cache, cache_keys::projects_all_prefix()).await;
}

async fn invalidate_task(
    cache: &dyn ResultCache,
    task: &Task,
    owner: &UserId,
) {
    caching::remove_key(cache, &cache_keys::task_key(task.id)).await;
    invalidate_task_lists(cache, task.project_id, owner).await;
}

pub(super) struct CreateTaskHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<CreateTask> for CreateTaskHandler<'_> {
    async fn handle(&self, request: CreateTask) -> Result<TaskView, Error> {
        let CreateTask {
            actor,
            project_id,
            title,
            description,
            status,
        } = request;

        let project = load_parent(self.store, project_id).await?;
        ensure_can_access(&actor, &project.owner_id, FORBIDDEN)?;
        let status = parse_status(&status)?;

        let task = Task::create(project.id, title, description, status);
        self.store.tasks.insert(&task).await?;
        self.store
            .outbox
            .publish(&DomainEvent::TaskCreated {
                task_id: task.id,
                project_id: task.project_id,
                title: task.title.clone(),
                occurred_at: Utc::now(),
            })
            .await?;

        invalidate_task_lists(self.cache, project.id, &project.owner_id).await;
        Ok(TaskView::from(task))
    }
}

pub(super) struct UpdateTaskHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<UpdateTask> for UpdateTaskHandler<'_> {
    async fn handle(&self, request: UpdateTask) -> Result<TaskView, Error> {
        let UpdateTask {
            actor,
            id,
            title,
            description,
            status,
        } = request;

        let mut task = self
            .store
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(TASK_NOT_FOUND))?;
        let project = load_parent(self.store, task.project_id).await?;
        ensure_can_access(&actor, &project.owner_id, FORBIDDEN)?;
        let status = parse_status(&status)?;

        let changed =
            task.title != title || task.description != description || task.status != status;
        task.title = title;
        task.description = description;
        task.status = status;
        self.store.tasks.update(&task).await?;

        if changed {
            self.store
                .outbox
                .publish(&DomainEvent::TaskUpdated {
                    task_id: task.id,
                    project_id: task.project_id,
                    title: task.title.clone(),
                    status: task.status,
                    occurred_at: Utc::now(),
                })
                .await?;
        }

        invalidate_task(self.cache, &task, &project.owner_id).await;
        Ok(TaskView::from(task))
    }
}

pub(super) struct DeleteTaskHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<DeleteTask> for DeleteTaskHandler<'_> {
    async fn handle(&self, request: DeleteTask) -> Result<(), Error> {
        let DeleteTask { actor, id } = request;

        let task = self
            .store
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(TASK_NOT_FOUND))?;
        let project = load_parent(self.store, task.project_id).await?;
        ensure_can_access(&actor, &project.owner_id, FORBIDDEN)?;

        self.store.tasks.delete(id).await?;
        self.store
            .outbox
            .publish(&DomainEvent::TaskDeleted {
                task_id: task.id,
                project_id: task.project_id,
                occurred_at: Utc::now(),
            })
            .await?;

        invalidate_task(self.cache, &task, &project.owner_id).await;
        Ok(())
    }
}

pub(super) struct GetTaskByIdHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<GetTaskById> for GetTaskByIdHandler<'_> {
    async fn handle(&self, request: GetTaskById) -> Result<TaskView, Error> {
        let key = cache_keys::task_key(request.id);
        // As with projects, a hit skips the access check.
        if let Some(view) = caching::read::<TaskView>(self.cache, &key).await {
            return Ok(view);
        }

        let task = self
            .store
            .tasks
            .find_by_id(request.id)
            .await?
            .ok_or_else(|| Error::not_found(TASK_NOT_FOUND))?;
        let project = load_parent(self.store, task.project_id).await?;
        ensure_can_access(&request.actor, &project.owner_id, FORBIDDEN)?;

        let view = TaskView::from(task);
        caching::write(self.cache, &key, &view).await;
        Ok(view)
    }
}

pub(super) struct ListTasksHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<ListTasks> for ListTasksHandler<'_> {
    async fn handle(&self, request: ListTasks) -> Result<PagedResult<TaskView>, Error> {
        let ListTasks {
            actor,
            project_id,
            params,
        } = request;

        // Existence and access run before the cache so a forbidden caller
        // cannot probe list contents.
        let project = load_parent(self.store, project_id).await?;
        ensure_can_access(&actor, &project.owner_id, FORBIDDEN)?;

        let key = cache_keys::tasks_project_list_key(project_id, &params.key_params());
        if let Some(page) = caching::read::<PagedResult<TaskView>>(self.cache, &key).await {
            return Ok(page);
        }

        let query = TaskQuery {
            project_id,
            search: params.normalized_search().map(str::to_owned),
            sort_by: params.sort_by.as_deref().and_then(TaskSortField::parse),
            sort_order: params.effective_sort_order(),
            page: params
                .page_request()
                .map_err(|error| Error::internal(error.to_string()))?,
        };

        let page = self.store.tasks.list(&query).await?.map(TaskView::from);
        caching::write(self.cache, &key, &page).await;
        Ok(page)
    }
}
