//! Domain layer: entities, errors, the dispatch pipeline, use-case
//! handlers, and the ports that bound the hexagon.

pub mod access;
pub mod actor;
pub mod cache_keys;
pub(crate) mod caching;
pub mod error;
pub mod events;
pub mod listing;
pub mod pipeline;
pub mod ports;
pub mod project;
pub mod projects;
pub mod task;
pub mod tasks;

pub use actor::Actor;
pub use error::{Error, ErrorCode, FieldViolation};
pub use events::DomainEvent;
pub use project::{Project, ProjectId, ProjectView, UserId};
pub use task::{Task, TaskId, TaskStatus, TaskView};
