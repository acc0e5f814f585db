//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (store, cache, bus, token verifier) are implemented by the
//! outbound adapters; driving ports (commands and queries per aggregate)
//! are implemented by the domain services and consumed by the HTTP layer.

mod macros;
pub(crate) use macros::define_port_error;

mod event_bus;
mod event_outbox;
mod outbox_store;
mod project_commands;
mod project_queries;
mod project_repository;
mod result_cache;
mod store;
mod task_commands;
mod task_queries;
mod task_repository;
mod token_verifier;
mod unit_of_work;

#[cfg(test)]
pub use event_bus::MockEventBus;
pub use event_bus::{EventBus, EventBusError, FixtureEventBus};
#[cfg(test)]
pub use event_outbox::MockEventOutbox;
pub use event_outbox::{EventOutbox, FixtureEventOutbox};
#[cfg(test)]
pub use outbox_store::MockOutboxStore;
pub use outbox_store::{OutboxRecord, OutboxStore};
#[cfg(test)]
pub use project_commands::MockProjectCommands;
pub use project_commands::ProjectCommands;
#[cfg(test)]
pub use project_queries::MockProjectQueries;
pub use project_queries::ProjectQueries;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::ProjectRepository;
#[cfg(test)]
pub use result_cache::MockResultCache;
pub use result_cache::{CacheError, FixtureResultCache, ResultCache};
#[cfg(test)]
pub use store::MockStoreFactory;
pub use store::{StoreError, StoreFactory, StoreSession};
#[cfg(test)]
pub use task_commands::MockTaskCommands;
pub use task_commands::TaskCommands;
#[cfg(test)]
pub use task_queries::MockTaskQueries;
pub use task_queries::TaskQueries;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::TaskRepository;
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{FixtureTokenVerifier, TokenVerifier, TokenVerifierError};
#[cfg(test)]
pub use unit_of_work::MockUnitOfWork;
pub use unit_of_work::{FixtureUnitOfWork, UnitOfWork};
