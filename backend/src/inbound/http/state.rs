//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on the driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ProjectCommands, ProjectQueries, TaskCommands, TaskQueries, TokenVerifier,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Project mutation use cases.
    pub project_commands: Arc<dyn ProjectCommands>,
    /// Project read use cases.
    pub project_queries: Arc<dyn ProjectQueries>,
    /// Task mutation use cases.
    pub task_commands: Arc<dyn TaskCommands>,
    /// Task read use cases.
    pub task_queries: Arc<dyn TaskQueries>,
    /// Bearer-token verifier backing the auth extractor.
    pub verifier: Arc<dyn TokenVerifier>,
}
