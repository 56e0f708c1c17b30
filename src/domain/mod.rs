//! Domain layer containing business entities and store contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Entity store trait definitions
//! - [`relationships`] - Cascade and ownership-transfer plans
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Cache consistency is orchestrated in [`crate::application`]

pub mod entities;
pub mod relationships;
pub mod repositories;
