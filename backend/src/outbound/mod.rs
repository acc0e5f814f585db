//! Outbound adapters implementing the domain's driven ports.

pub mod bus;
pub mod cache;
pub mod identity;
pub mod outbox;
pub mod persistence;
