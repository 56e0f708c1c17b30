//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Schema
//! lives in `migrations/` and is applied at startup.
//!
//! # Repositories
//!
//! - [`PgCustomerRepository`] - Customers and their natural keys
//! - [`PgCarRepository`] - Cars, VIN lookup, cars of a customer
//! - [`PgServiceCenterRepository`] - Service centers and their natural keys
//! - [`PgServiceRequestRepository`] - Requests and lookups by parent
//! - [`PgUnitOfWork`] - Cascading deletes and ownership transfers

pub mod pg_car_repository;
pub mod pg_customer_repository;
pub mod pg_service_center_repository;
pub mod pg_service_request_repository;
pub mod pg_unit_of_work;
mod rows;

use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::EntityStore;

pub use pg_car_repository::PgCarRepository;
pub use pg_customer_repository::PgCustomerRepository;
pub use pg_service_center_repository::PgServiceCenterRepository;
pub use pg_service_request_repository::PgServiceRequestRepository;
pub use pg_unit_of_work::PgUnitOfWork;

/// Builds an [`EntityStore`] backed by `pool`.
pub fn pg_entity_store(pool: Arc<PgPool>) -> EntityStore {
    EntityStore::new(
        Arc::new(PgCustomerRepository::new(pool.clone())),
        Arc::new(PgCarRepository::new(pool.clone())),
        Arc::new(PgServiceCenterRepository::new(pool.clone())),
        Arc::new(PgServiceRequestRepository::new(pool.clone())),
        Arc::new(PgUnitOfWork::new(pool)),
    )
}
