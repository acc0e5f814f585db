//! Multi-tenant project and task management service.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities, the
//! command/query pipeline, and the ports; `inbound` adapts HTTP onto the
//! driving ports; `outbound` implements the driven ports over PostgreSQL,
//! Redis, and in-memory fallbacks; `server` wires the two sides together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
