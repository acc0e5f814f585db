//! Server construction: adapter selection, state wiring, and the listener.
//!
//! Adapters are chosen from configuration: PostgreSQL and Redis when their
//! URLs are set, in-memory fallbacks otherwise so the server runs locally
//! with no backing services.

mod config;

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};

pub use config::{ConfigError, ServerConfig};

use crate::doc::serve_openapi;
use crate::domain::ports::{
    EventBus, FixtureEventBus, OutboxStore, ResultCache, StoreFactory,
};
use crate::domain::projects::ProjectService;
use crate::domain::tasks::TaskService;
use crate::inbound::http::{configure, HttpState};
use crate::middleware::Trace;
use crate::outbound::bus::RedisEventBus;
use crate::outbound::cache::{InMemoryCache, RedisResultCache};
use crate::outbound::identity::JwtTokenVerifier;
use crate::outbound::outbox::OutboxDispatcher;
use crate::outbound::persistence::memory::InMemoryStore;
use crate::outbound::persistence::{DbPool, DieselOutboxStore, DieselStoreFactory, PoolConfig};

/// Fully wired application: handler state plus the outbox dispatcher.
pub struct AppParts {
    /// Dependency bundle for the HTTP handlers.
    pub state: HttpState,
    /// Background relay; spawn its `run` future beside the server.
    pub dispatcher: OutboxDispatcher,
}

async fn store_adapters(
    config: &ServerConfig,
) -> std::io::Result<(Arc<dyn StoreFactory>, Arc<dyn OutboxStore>)> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            info!("using PostgreSQL store");
            Ok((
                Arc::new(DieselStoreFactory::new(pool.clone())),
                Arc::new(DieselOutboxStore::new(pool)),
            ))
        }
        None => {
            warn!("DATABASE_URL unset, using the in-memory store (data is not persisted)");
            let store = InMemoryStore::new();
            Ok((Arc::new(store.clone()), Arc::new(store)))
        }
    }
}

async fn cache_and_bus(
    config: &ServerConfig,
) -> std::io::Result<(Arc<dyn ResultCache>, Arc<dyn EventBus>)> {
    match config.redis_url.as_deref() {
        Some(url) => {
            let cache = RedisResultCache::connect(url, config.cache_ttl)
                .await
                .map_err(std::io::Error::other)?;
            let bus = RedisEventBus::connect(url)
                .await
                .map_err(std::io::Error::other)?;
            info!("using Redis cache and event bus");
            Ok((Arc::new(cache), Arc::new(bus)))
        }
        None => {
            warn!("REDIS_URL unset, using in-memory cache and dropping events");
            Ok((Arc::new(InMemoryCache::new()), Arc::new(FixtureEventBus)))
        }
    }
}

/// Select adapters from the configuration and wire the services.
pub async fn build_parts(config: &ServerConfig) -> std::io::Result<AppParts> {
    let (store, outbox_store) = store_adapters(config).await?;
    let (cache, bus) = cache_and_bus(config).await?;

    let projects = Arc::new(ProjectService::new(Arc::clone(&store), Arc::clone(&cache)));
    let tasks = Arc::new(TaskService::new(store, cache));
    let state = HttpState {
        project_commands: projects.clone(),
        project_queries: projects,
        task_commands: tasks.clone(),
        task_queries: tasks,
        verifier: Arc::new(JwtTokenVerifier::new(
            &config.jwt_secret,
            config.admin_group.clone(),
        )),
    };
    let dispatcher = OutboxDispatcher::new(outbox_store, bus, config.outbox_poll_interval);
    Ok(AppParts { state, dispatcher })
}

/// Build the application, spawn the dispatcher, and serve until shutdown.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let parts = build_parts(&config).await?;
    let state = parts.state;
    tokio::spawn(parts.dispatcher.run());

    info!(addr = %config.bind_addr, "listening");
    HttpServer::new(move || {
        App::new()
            .wrap(Trace)
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
            .route("/api-docs/openapi.json", web::get().to(serve_openapi))
    })
    .bind(config.bind_addr)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn dev_config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().expect("valid address"),
            database_url: None,
            redis_url: None,
            jwt_secret: "test-secret".to_owned(),
            admin_group: "admin".to_owned(),
            cache_ttl: Duration::from_secs(300),
            outbox_poll_interval: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn in_memory_fallbacks_wire_without_backing_services() {
        let parts = build_parts(&dev_config()).await.expect("parts built");
        let delivered = parts.dispatcher.tick().await.expect("empty tick");
        assert_eq!(delivered, 0);
    }
}
