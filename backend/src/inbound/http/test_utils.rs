//! Helpers for HTTP handler tests: an in-memory backend and a verifier
//! that trusts the bearer token as the subject name.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ResultCache, StoreFactory, TokenVerifier, TokenVerifierError};
use crate::domain::projects::ProjectService;
use crate::domain::tasks::TaskService;
use crate::domain::Actor;
use crate::inbound::http::state::HttpState;
use crate::outbound::cache::InMemoryCache;
use crate::outbound::persistence::memory::{seed_example_data, InMemoryStore};

/// Verifier treating the raw token as the subject; the literal token
/// `admin` gets the admin flag. Only for tests.
pub struct TokenAsSubject;

#[async_trait]
impl TokenVerifier for TokenAsSubject {
    async fn verify(&self, token: &str) -> Result<Actor, TokenVerifierError> {
        if token == "admin" {
            Ok(Actor::admin("admin"))
        } else {
            Ok(Actor::user(token))
        }
    }
}

fn state_over(store: InMemoryStore) -> HttpState {
    let store: Arc<dyn StoreFactory> = Arc::new(store);
    let cache: Arc<dyn ResultCache> = Arc::new(InMemoryCache::new());
    let projects = Arc::new(ProjectService::new(Arc::clone(&store), Arc::clone(&cache)));
    let tasks = Arc::new(TaskService::new(store, cache));
    HttpState {
        project_commands: projects.clone(),
        project_queries: projects,
        task_commands: tasks.clone(),
        task_queries: tasks,
        verifier: Arc::new(TokenAsSubject),
    }
}

/// State over an empty in-memory backend.
pub fn empty_state() -> HttpState {
    state_over(InMemoryStore::new())
}

/// State over the seeded example data set.
pub async fn seeded_state() -> HttpState {
    let store = InMemoryStore::new();
    seed_example_data(&store).await.expect("seed example data");
    state_over(store)
}
