//! Store adapters: PostgreSQL via Diesel, plus an in-memory fallback.
//!
//! The diesel adapters are thin translations between row structs
//! (`models.rs`, `schema.rs`) and domain types; business rules stay in the
//! domain layer. Each request gets its own [`DbSession`] so the repositories,
//! outbox and unit of work opened together share one pooled connection and
//! one transaction. Transient failures are retried with backoff before they
//! surface.

mod diesel_outbox;
mod diesel_project_repository;
mod diesel_store_factory;
mod diesel_task_repository;
mod diesel_unit_of_work;
mod helpers;
pub mod memory;
mod models;
mod pool;
mod retry;
mod schema;
mod session;

pub use diesel_outbox::{DieselEventOutbox, DieselOutboxStore};
pub use diesel_project_repository::DieselProjectRepository;
pub use diesel_store_factory::DieselStoreFactory;
pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_unit_of_work::DieselUnitOfWork;
pub use pool::{DbPool, PoolConfig, PoolError};
