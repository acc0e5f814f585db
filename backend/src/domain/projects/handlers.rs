//! Project use-case handlers.
//!
//! Every command follows the same skeleton: existence check, access check,
//! uniqueness pre-check where a name changes hands, persist, queue the
//! event through the outbox (same transaction as the write), then
//! best-effort cache invalidation. Queries are cache-aside.

use async_trait::async_trait;
use chrono::Utc;
use pagination::PagedResult;

use super::requests::{CreateProject, DeleteProject, GetProjectById, ListProjects, UpdateProject};
use crate::domain::access::ensure_can_access;
use crate::domain::caching;
use crate::domain::cache_keys;
use crate::domain::error::Error;
use crate::domain::events::DomainEvent;
use crate::domain::listing::{ProjectQuery, ProjectSortField, Scope};
use crate::domain::pipeline::Handler;
use crate::domain::ports::{ResultCache, StoreSession};
use crate::domain::project::{Project, ProjectId, ProjectView, UserId};

const NOT_FOUND: &str = "Project not found.";
const FORBIDDEN: &str = "You do not have access to this project.";

fn name_conflict(name: &str) -> Error {
    Error::conflict(format!("A project named '{name}' already exists."))
}

async fn invalidate_lists(cache: &dyn ResultCache, owner: &UserId) {
    caching::remove_prefix(cache, &cache_keys::projects_user_prefix(owner)).await;
    caching::remove_prefix(cache, cache_keys::projects_all_prefix()).await;
}

async fn invalidate_project(cache: &dyn ResultCache, id: ProjectId, owner: &UserId) {
    caching::remove_key(cache, &cache_keys::project_key(id)).await;
    caching::remove_prefix(cache, &cache_keys::tasks_project_prefix(id)).await;
    invalidate_lists(cache, owner).await;
}

pub(super) struct CreateProjectHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<CreateProject> for CreateProjectHandler<'_> {
    async fn handle(&self, request: CreateProject) -> Result<ProjectView, Error> {
        let CreateProject {
            actor,
            name,
            description,
        } = request;

        if self
            .store
            .projects
            .name_taken(&actor.user_id, &name, None)
            .await?
        {
            return Err(name_conflict(&name));
        }

        let project = Project::create(actor.user_id, name, description);
        self.store.projects.insert(&project).await?;
        self.store
            .outbox
            .publish(&DomainEvent::ProjectCreated {
                project_id: project.id,
                name: project.name.clone(),
                owner_id: project.owner_id.clone(),
                occurred_at: Utc::now(),
            })
            .await?;

        invalidate_lists(self.cache, &project.owner_id).await;
        Ok(ProjectView::from(project))
    }
}

pub(super) struct UpdateProjectHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<UpdateProject> for UpdateProjectHandler<'_> {
    async fn handle(&self, request: UpdateProject) -> Result<ProjectView, Error> {
        let UpdateProject {
            actor,
            id,
            name,
            description,
        } = request;

        let mut project = self
            .store
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        ensure_can_access(&actor, &project.owner_id, FORBIDDEN)?;

        let changed = project.name != name || project.description != description;
        if project.name != name
            && self
                .store
                .projects
                .name_taken(&project.owner_id, &name, Some(id))
                .await?
        {
            return Err(name_conflict(&name));
        }

        project.name = name;
        project.description = description;
        self.store.projects.update(&project).await?;

        if changed {
            self.store
                .outbox
                .publish(&DomainEvent::ProjectUpdated {
                    project_id: project.id,
                    name: project.name.clone(),
                    owner_id: project.owner_id.clone(),
                    occurred_at: Utc::now(),
                })
                .await?;
        }

        invalidate_project(self.cache, project.id, &project.owner_id).await;
        Ok(ProjectView::from(project))
    }
}

pub(super) struct DeleteProjectHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<DeleteProject> for DeleteProjectHandler<'_> {
    async fn handle(&self, request: DeleteProject) -> Result<(), Error> {
        let DeleteProject { actor, id } = request;

        let project = self
            .store
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        ensure_can_access(&actor, &project.owner_id, FORBIDDEN)?;

        // Tasks go with the project at the store level.
        self.store.projects.delete(id).await?;
        self.store
            .outbox
            .publish(&DomainEvent::ProjectDeleted {
                project_id: project.id,
                owner_id: project.owner_id.clone(),
                occurred_at: Utc::now(),
            })
            .await?;

        invalidate_project(self.cache, project.id, &project.owner_id).await;
        Ok(())
    }
}

pub(super) struct GetProjectByIdHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<GetProjectById> for GetProjectByIdHandler<'_> {
    async fn handle(&self, request: GetProjectById) -> Result<ProjectView, Error> {
        let key = cache_keys::project_key(request.id);
        // A hit returns without re-checking access; invalidation on every
        // mutation keeps the window at one TTL.
        if let Some(view) = caching::read::<ProjectView>(self.cache, &key).await {
            return Ok(view);
        }

        let project = self
            .store
            .projects
            .find_by_id(request.id)
            .await?
            .ok_or_else(|| Error::not_found(NOT_FOUND))?;
        ensure_can_access(&request.actor, &project.owner_id, FORBIDDEN)?;

        let view = ProjectView::from(project);
        caching::write(self.cache, &key, &view).await;
        Ok(view)
    }
}

pub(super) struct ListProjectsHandler<'a> {
    pub store: &'a StoreSession,
    pub cache: &'a dyn ResultCache,
}

#[async_trait]
impl Handler<ListProjects> for ListProjectsHandler<'_> {
    async fn handle(&self, request: ListProjects) -> Result<PagedResult<ProjectView>, Error> {
        let ListProjects { actor, params } = request;

        let key = if actor.is_admin {
            cache_keys::projects_all_list_key(&params.key_params())
        } else {
            cache_keys::projects_user_list_key(&actor.user_id, &params.key_params())
        };
        if let Some(page) = caching::read::<PagedResult<ProjectView>>(self.cache, &key).await {
            return Ok(page);
        }

        let scope = if actor.is_admin {
            Scope::All
        } else {
            Scope::Owner(actor.user_id)
        };
        let query = ProjectQuery {
            scope,
            search: params.normalized_search().map(str::to_owned),
            sort_by: params.sort_by.as_deref().and_then(ProjectSortField::parse),
            sort_order: params.effective_sort_order(),
            page: params
                .page_request()
                .map_err(|error| Error::internal(error.to_string()))?,
        };

        let page = self
            .store
            .projects
            .list(&query)
            .await?
            .map(ProjectView::from);
        caching::write(self.cache, &key, &page).await;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::actor::Actor;
    use crate::domain::error::ErrorCode;
    use crate::domain::listing::ListParams;
    use crate::domain::ports::{
        FixtureResultCache, FixtureUnitOfWork, MockEventOutbox, MockProjectRepository,
        MockResultCache, MockTaskRepository,
    };
    use pagination::PageRequest;

    fn owned_project(owner: &str, name: &str) -> Project {
        Project::create(UserId::new(owner), name.to_owned(), None)
    }

    fn session(projects: MockProjectRepository, outbox: MockEventOutbox) -> StoreSession {
        StoreSession {
            projects: Arc::new(projects),
            tasks: Arc::new(MockTaskRepository::new()),
            outbox: Arc::new(outbox),
            unit_of_work: Arc::new(FixtureUnitOfWork),
        }
    }

    #[tokio::test]
    async fn create_conflicts_when_the_owner_reuses_a_name() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_name_taken()
            .times(1)
            .returning(|_, _, _| Ok(true));
        projects.expect_insert().never();
        let store = session(projects, MockEventOutbox::new());

        let handler = CreateProjectHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        let error = handler
            .handle(CreateProject {
                actor: Actor::user("user1"),
                name: "Alpha".to_owned(),
                description: None,
            })
            .await
            .expect_err("duplicate name must conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn create_persists_and_queues_the_created_event() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_name_taken()
            .times(1)
            .returning(|_, _, _| Ok(false));
        projects.expect_insert().times(1).returning(|_| Ok(()));
        let mut outbox = MockEventOutbox::new();
        outbox
            .expect_publish()
            .times(1)
            .withf(|event| event.topic() == "projects.created")
            .returning(|_| Ok(()));
        let store = session(projects, outbox);

        let handler = CreateProjectHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        let view = handler
            .handle(CreateProject {
                actor: Actor::user("user1"),
                name: "Alpha".to_owned(),
                description: Some("first".to_owned()),
            })
            .await
            .expect("create succeeds");
        assert_eq!(view.name, "Alpha");
        assert_eq!(view.owner_id, UserId::new("user1"));
    }

    #[tokio::test]
    async fn update_of_a_missing_project_is_not_found() {
        let mut projects = MockProjectRepository::new();
        projects.expect_find_by_id().returning(|_| Ok(None));
        let store = session(projects, MockEventOutbox::new());

        let handler = UpdateProjectHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        let error = handler
            .handle(UpdateProject {
                actor: Actor::user("user1"),
                id: ProjectId::random(),
                name: "Alpha".to_owned(),
                description: None,
            })
            .await
            .expect_err("missing project");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Project not found.");
    }

    #[tokio::test]
    async fn update_by_a_non_owner_is_forbidden() {
        let project = owned_project("user2", "Gamma");
        let mut projects = MockProjectRepository::new();
        let found = project.clone();
        projects
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        projects.expect_update().never();
        let store = session(projects, MockEventOutbox::new());

        let handler = UpdateProjectHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        let error = handler
            .handle(UpdateProject {
                actor: Actor::user("user1"),
                id: project.id,
                name: "Gamma".to_owned(),
                description: None,
            })
            .await
            .expect_err("foreign project");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn noop_update_persists_but_queues_no_event() {
        let project = owned_project("user1", "Alpha");
        let mut projects = MockProjectRepository::new();
        let found = project.clone();
        projects
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        projects.expect_update().times(1).returning(|_| Ok(()));
        let mut outbox = MockEventOutbox::new();
        outbox.expect_publish().never();
        let store = session(projects, outbox);

        let handler = UpdateProjectHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        handler
            .handle(UpdateProject {
                actor: Actor::user("user1"),
                id: project.id,
                name: project.name.clone(),
                description: project.description.clone(),
            })
            .await
            .expect("no-op update succeeds");
    }

    #[tokio::test]
    async fn rename_uniqueness_check_excludes_the_project_itself() {
        let project = owned_project("user1", "Alpha");
        let id = project.id;
        let mut projects = MockProjectRepository::new();
        let found = project.clone();
        projects
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        projects
            .expect_name_taken()
            .times(1)
            .withf(move |_, name, exclude| name == "Beta" && *exclude == Some(id))
            .returning(|_, _, _| Ok(true));
        projects.expect_update().never();
        let store = session(projects, MockEventOutbox::new());

        let handler = UpdateProjectHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        let error = handler
            .handle(UpdateProject {
                actor: Actor::user("user1"),
                id,
                name: "Beta".to_owned(),
                description: None,
            })
            .await
            .expect_err("rename onto a taken name");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn delete_queues_the_deleted_event_unconditionally() {
        let project = owned_project("user1", "Alpha");
        let mut projects = MockProjectRepository::new();
        let found = project.clone();
        projects
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        projects.expect_delete().times(1).returning(|_| Ok(()));
        let mut outbox = MockEventOutbox::new();
        outbox
            .expect_publish()
            .times(1)
            .withf(|event| event.topic() == "projects.deleted")
            .returning(|_| Ok(()));
        let store = session(projects, outbox);

        let handler = DeleteProjectHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        handler
            .handle(DeleteProject {
                actor: Actor::user("user1"),
                id: project.id,
            })
            .await
            .expect("delete succeeds");
    }

    #[tokio::test]
    async fn cached_project_is_returned_without_touching_the_store() {
        let project = owned_project("user2", "Gamma");
        let cached = serde_json::to_string(&ProjectView::from(project.clone()))
            .expect("serializable view");
        let mut cache = MockResultCache::new();
        cache
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(cached.clone())));
        // No repository expectations: a store call would panic the test.
        let store = session(MockProjectRepository::new(), MockEventOutbox::new());

        let handler = GetProjectByIdHandler {
            store: &store,
            cache: &cache,
        };
        let view = handler
            .handle(GetProjectById {
                actor: Actor::user("user1"),
                id: project.id,
            })
            .await
            .expect("hit bypasses the store and the access check");
        assert_eq!(view.name, "Gamma");
    }

    #[tokio::test]
    async fn list_scopes_non_admins_to_their_own_projects() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_list()
            .times(1)
            .withf(|query| query.scope == Scope::Owner(UserId::new("user1")))
            .returning(|query| {
                Ok(PagedResult::new(
                    vec![owned_project("user1", "Alpha")],
                    1,
                    query.page,
                ))
            });
        let store = session(projects, MockEventOutbox::new());

        let handler = ListProjectsHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        let page = handler
            .handle(ListProjects {
                actor: Actor::user("user1"),
                params: ListParams::default(),
            })
            .await
            .expect("list succeeds");
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn admins_list_every_project() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_list()
            .times(1)
            .withf(|query| query.scope == Scope::All)
            .returning(|query| Ok(PagedResult::new(Vec::new(), 0, query.page)));
        let store = session(projects, MockEventOutbox::new());

        let handler = ListProjectsHandler {
            store: &store,
            cache: &FixtureResultCache,
        };
        handler
            .handle(ListProjects {
                actor: Actor::admin("admin1"),
                params: ListParams {
                    page: Some(1),
                    page_size: Some(PageRequest::default().size()),
                    ..ListParams::default()
                },
            })
            .await
            .expect("admin list succeeds");
    }
}
