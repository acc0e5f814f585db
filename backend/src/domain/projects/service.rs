//! Project use-case service wiring the handlers to the pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PagedResult;

use super::handlers::{
    CreateProjectHandler, DeleteProjectHandler, GetProjectByIdHandler, ListProjectsHandler,
    UpdateProjectHandler,
};
use super::requests::{CreateProject, DeleteProject, GetProjectById, ListProjects, UpdateProject};
use crate::domain::error::Error;
use crate::domain::pipeline::dispatch;
use crate::domain::ports::{ProjectCommands, ProjectQueries, ResultCache, StoreFactory};
use crate::domain::project::ProjectView;

/// Implements the project driving ports by opening one store session per
/// call and dispatching through the behavior pipeline.
pub struct ProjectService {
    store: Arc<dyn StoreFactory>,
    cache: Arc<dyn ResultCache>,
}

impl ProjectService {
    /// Build a service over the given store factory and result cache.
    pub fn new(store: Arc<dyn StoreFactory>, cache: Arc<dyn ResultCache>) -> Self {
        Self { store, cache }
    }
}

#[async_trait]
impl ProjectCommands for ProjectService {
    async fn create_project(&self, request: CreateProject) -> Result<ProjectView, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = CreateProjectHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }

    async fn update_project(&self, request: UpdateProject) -> Result<ProjectView, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = UpdateProjectHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }

    async fn delete_project(&self, request: DeleteProject) -> Result<(), Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = DeleteProjectHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }
}

#[async_trait]
impl ProjectQueries for ProjectService {
    async fn get_project(&self, request: GetProjectById) -> Result<ProjectView, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = GetProjectByIdHandler {
            store: &session,
            cache: self.cache.as_ref(),
        };
        dispatch(request, &handler, session.unit_of_work.as_ref()).await
    }

    async fn list_projects(
        &self,
        request: ListProjects,
    ) -> Result<PagedResult<ProjectView>, Error> {
        let session = self.store.open().await.map_err(Error::from)?;
        let handler = ListProjectsHandler {
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
    use crate::outbound::cache::InMemoryCache;
    use crate::outbound::persistence::memory::{InMemoryStore, seed_example_data};

    fn service(store: &Arc<InMemoryStore>, cache: &Arc<InMemoryCache>) -> ProjectService {
        ProjectService::new(
            Arc::clone(store) as Arc<dyn StoreFactory>,
            Arc::clone(cache) as Arc<dyn ResultCache>,
        )
    }

    async fn seeded() -> (Arc<InMemoryStore>, Arc<InMemoryCache>, ProjectService) {
        let store = Arc::new(InMemoryStore::new());
        seed_example_data(&store).await.expect("seed succeeds");
        let cache = Arc::new(InMemoryCache::new());
        let svc = service(&store, &cache);
        (store, cache, svc)
    }

    fn list_for(actor: Actor) -> ListProjects {
        ListProjects {
            actor,
            params: ListParams::default(),
        }
    }

    #[tokio::test]
    async fn users_only_see_their_own_projects() {
        let (_store, _cache, svc) = seeded().await;

        let mine = svc
            .list_projects(list_for(Actor::user("user1")))
            .await
            .expect("user1 list");
        let names: Vec<_> = mine.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);

        let theirs = svc
            .list_projects(list_for(Actor::user("user2")))
            .await
            .expect("user2 list");
        assert_eq!(theirs.items.len(), 1);
        assert_eq!(theirs.items[0].name, "Gamma");

        let all = svc
            .list_projects(list_for(Actor::admin("admin1")))
            .await
            .expect("admin list");
        assert_eq!(all.total_count, 3);
    }

    #[tokio::test]
    async fn cross_tenant_reads_are_forbidden() {
        let (_store, _cache, svc) = seeded().await;
        let gamma = svc
            .list_projects(list_for(Actor::user("user2")))
            .await
            .expect("user2 list")
            .items
            .remove(0);

        let error = svc
            .get_project(GetProjectById {
                actor: Actor::user("user1"),
                id: gamma.id,
            })
            .await
            .expect_err("foreign project read");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn duplicate_names_conflict_per_owner_but_not_across_owners() {
        let (_store, _cache, svc) = seeded().await;

        let error = svc
            .create_project(CreateProject {
                actor: Actor::user("user1"),
                name: "Alpha".to_owned(),
                description: None,
            })
            .await
            .expect_err("user1 already has Alpha");
        assert_eq!(error.code(), ErrorCode::Conflict);

        svc.create_project(CreateProject {
            actor: Actor::user("user2"),
            name: "Alpha".to_owned(),
            description: None,
        })
        .await
        .expect("user2 may reuse the name");
    }

    #[tokio::test]
    async fn deleted_projects_read_back_as_not_found() {
        let (_store, _cache, svc) = seeded().await;
        let alpha = svc
            .list_projects(list_for(Actor::user("user1")))
            .await
            .expect("list")
            .items
            .remove(0);

        svc.delete_project(DeleteProject {
            actor: Actor::user("user1"),
            id: alpha.id,
        })
        .await
        .expect("delete succeeds");

        let error = svc
            .get_project(GetProjectById {
                actor: Actor::user("user1"),
                id: alpha.id,
            })
            .await
            .expect_err("deleted project");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn lists_stay_coherent_after_a_create() {
        let (_store, _cache, svc) = seeded().await;

        let before = svc
            .list_projects(list_for(Actor::user("user1")))
            .await
            .expect("first list populates the cache");
        assert_eq!(before.total_count, 2);

        svc.create_project(CreateProject {
            actor: Actor::user("user1"),
            name: "Delta".to_owned(),
            description: None,
        })
        .await
        .expect("create succeeds");

        let after = svc
            .list_projects(list_for(Actor::user("user1")))
            .await
            .expect("list after invalidation");
        assert_eq!(after.total_count, 3);
    }

    #[tokio::test]
    async fn validation_failures_aggregate_every_violation() {
        let (_store, _cache, svc) = seeded().await;

        let error = svc
            .create_project(CreateProject {
                actor: Actor::user("user1"),
                name: String::new(),
                description: Some("y".repeat(501)),
            })
            .await
            .expect_err("invalid request");
        assert_eq!(error.code(), ErrorCode::ValidationFailed);
        assert_eq!(error.violations().len(), 2);
    }
}
