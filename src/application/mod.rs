//! Application layer: relationship tracking, cache consistency and the
//! entity services.
//!
//! # Components
//!
//! - [`graph::RelationshipGraph`] - cascade plans and derived reverse views
//! - [`coordinator::ConsistencyCoordinator`] - store-then-cache ordering for
//!   every mutation and read-through fill
//! - [`services`] - one façade per entity kind

pub mod coordinator;
pub mod graph;
pub mod services;
