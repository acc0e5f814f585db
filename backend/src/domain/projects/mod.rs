//! Project use cases: requests, handlers, and the driving-port service.

mod handlers;
mod requests;
mod service;

pub use requests::{CreateProject, DeleteProject, GetProjectById, ListProjects, UpdateProject};
pub use service::ProjectService;
