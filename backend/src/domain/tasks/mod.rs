//! Task use cases: requests, handlers, and the driving-port service.

mod handlers;
mod requests;
mod service;

pub use requests::{CreateTask, DeleteTask, GetTaskById, ListTasks, UpdateTask};
pub use service::TaskService;
