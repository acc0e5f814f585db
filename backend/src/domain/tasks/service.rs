//! Task use-case service wiring the handlers to the pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PagedResult;

use super::handlers::{
    CreateTaskHandler, DeleteTaskHandler, GetTaskByIdHandler, ListTasksHandler, UpdateTaskHandler,
};
use super::requests::{CreateTask, DeleteTask, GetTaskById, ListTasks, UpdateTask};
use crate::domain::error::Error;
use crate::domain::pipeline::dispatch;
use crate::domain::ports::{ResultCache, StoreFactory, TaskCommands, TaskQueries};
use crate::domain::task::TaskView;

/// Implements the task driving ports by opening one store session per call
/// and dispatching through the behavior pipeline.
pub struct TaskService {
    store: Arc<dyn StoreFactory>,
    cache: Arc<dyn ResultCache>,
}

impl TaskService {
    /// Build a service over the given store factory and result cache.
    pub fn new(store: Arc<dyn StoreFactory>, cache: Arc<dyn ResultCache>) -> Self {
        Self { store, cache }
    }
}

#[async_trait]
impl TaskCommands for TaskService {
    async fn create_task(&self, request: CreateTask) -> Result<TaskView, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = CreateTaskHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }

    async fn update_task(&self, request: UpdateTask) -> Result<TaskView, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = UpdateTaskHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }

    async fn delete_task(&self, request: DeleteTask) -> Result<(), Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = DeleteTaskHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }
}

#[async_trait]
impl TaskQueries for TaskService {
    async fn get_task(&self, request: GetTaskById) -> Result<TaskView, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = GetTaskByIdHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }

    async fn list_tasks(&self, request: ListTasks) -> Result<PagedResult<TaskView>, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = ListTasksHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Actor;
    use crate::domain::error::ErrorCode;
    use crate::domain::listing::ListParams;
    use crate::domain::ports::{ProjectCommands, ProjectQueries};
    use crate::domain::projects::{DeleteProject, ListProjects, ProjectService};
    use crate::domain::task::TaskStatus;
    use crate::outbound::cache::InMemoryCache;
    use crate::outbound::persistence::memory::{InMemoryStore, seed_example_data};

    struct Harness {
        projects: ProjectService,
        tasks: TaskService,
    }

    async fn seeded() -> Harness {
        let store = Arc::new(InMemoryStore::new());
        seed_example_data(&store).await.expect("seed succeeds");
        let cache = Arc::new(InMemoryCache::new());
        Harness {
            projects: ProjectService::new(
                Arc::clone(&store) as Arc<dyn StoreFactory>,
                Arc::clone(&cache) as Arc<dyn ResultCache>,
            ),
            tasks: TaskService::new(store, cache),
        }
    }

    async fn alpha_id(harness: &Harness) -> crate::domain::project::ProjectId {
        harness
            .projects
            .list_projects(ListProjects {
                actor: Actor::user("user1"),
                params: ListParams::default(),
            })
            .await
            .expect("list")
            .items
            .remove(0)
            .id
    }

    fn list_request(
        actor: Actor,
        project_id: crate::domain::project::ProjectId,
    ) -> ListTasks {
        ListTasks {
            actor,
            project_id,
            params: ListParams::default(),
        }
    }

    #[tokio::test]
    async fn seeded_tasks_are_listed_under_their_project() {
        let harness = seeded().await;
        let alpha = alpha_id(&harness).await;

        let page = harness
            .tasks
            .list_tasks(list_request(Actor::user("user1"), alpha))
            .await
            .expect("list tasks");
        assert_eq!(page.total_count, 2);
        assert!(page.items.iter().all(|task| task.project_id == alpha));
    }

    #[tokio::test]
    async fn foreign_users_cannot_list_tasks() {
        let harness = seeded().await;
        let alpha = alpha_id(&harness).await;

        let error = harness
            .tasks
            .list_tasks(list_request(Actor::user("user2"), alpha))
            .await
            .expect_err("foreign project");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn task_lifecycle_round_trips() {
        let harness = seeded().await;
        let alpha = alpha_id(&harness).await;

        let created = harness
            .tasks
            .create_task(CreateTask {
                actor: Actor::user("user1"),
                project_id: alpha,
                title: "Ship it".to_owned(),
                description: Some("cut a release".to_owned()),
                status: "todo".to_owned(),
            })
            .await
            .expect("create");

        let updated = harness
            .tasks
            .update_task(UpdateTask {
                actor: Actor::user("user1"),
                id: created.id,
                title: "Ship it".to_owned(),
                description: created.description.clone(),
                status: "done".to_owned(),
            })
            .await
            .expect("update");
        assert_eq!(updated.status, TaskStatus::Done);

        harness
            .tasks
            .delete_task(DeleteTask {
                actor: Actor::user("user1"),
                id: created.id,
            })
            .await
            .expect("delete");

        let error = harness
            .tasks
            .get_task(GetTaskById {
                actor: Actor::user("user1"),
                id: created.id,
            })
            .await
            .expect_err("deleted task");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn deleting_a_project_cascades_to_its_tasks() {
        let harness = seeded().await;
        let alpha = alpha_id(&harness).await;
        let task = harness
            .tasks
            .list_tasks(list_request(Actor::user("user1"), alpha))
            .await
            .expect("list tasks")
            .items
            .remove(0);

        harness
            .projects
            .delete_project(DeleteProject {
                actor: Actor::user("user1"),
                id: alpha,
            })
            .await
            .expect("delete project");

        let error = harness
            .tasks
            .get_task(GetTaskById {
                actor: Actor::user("user1"),
                id: task.id,
            })
            .await
            .expect_err("task went with the project");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn task_lists_stay_coherent_after_a_create() {
        let harness = seeded().await;
        let alpha = alpha_id(&harness).await;

        let before = harness
            .tasks
            .list_tasks(list_request(Actor::user("user1"), alpha))
            .await
            .expect("first list populates the cache");

        harness
            .tasks
            .create_task(CreateTask {
                actor: Actor::user("user1"),
                project_id: alpha,
                title: "New task".to_owned(),
                description: None,
                status: "inProgress".to_owned(),
            })
            .await
            .expect("create");

        let after = harness
            .tasks
            .list_tasks(list_request(Actor::user("user1"), alpha))
            .await
            .expect("list after invalidation");
        assert_eq!(after.total_count, before.total_count + 1);
    }
}
