//! Repository trait definitions for the domain layer.
//!
//! These traits are the entity store collaborator: the authoritative,
//! transactional source of truth that the cache layer sits in front of.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`CustomerRepository`] - Customer CRUD and natural-key lookups
//! - [`CarRepository`] - Car CRUD, VIN lookup, cars of a customer
//! - [`ServiceCenterRepository`] - Service center CRUD and natural-key lookups
//! - [`ServiceRequestRepository`] - Request CRUD and lookups by parent
//! - [`UnitOfWork`] - Cascading delete and ownership transfer in one transaction

pub mod car_repository;
pub mod customer_repository;
pub mod service_center_repository;
pub mod service_request_repository;
pub mod unit_of_work;

use std::sync::Arc;

pub use car_repository::CarRepository;
pub use customer_repository::CustomerRepository;
pub use service_center_repository::ServiceCenterRepository;
pub use service_request_repository::ServiceRequestRepository;
pub use unit_of_work::UnitOfWork;

#[cfg(test)]
pub use car_repository::MockCarRepository;
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
#[cfg(test)]
pub use service_center_repository::MockServiceCenterRepository;
#[cfg(test)]
pub use service_request_repository::MockServiceRequestRepository;
#[cfg(test)]
pub use unit_of_work::MockUnitOfWork;

/// Handles to every repository of the store.
///
/// Cloning is cheap; all handles are shared.
#[derive(Clone)]
pub struct EntityStore {
    pub customers: Arc<dyn CustomerRepository>,
    pub cars: Arc<dyn CarRepository>,
    pub service_centers: Arc<dyn ServiceCenterRepository>,
    pub service_requests: Arc<dyn ServiceRequestRepository>,
    pub unit_of_work: Arc<dyn UnitOfWork>,
}

impl EntityStore {
    /// Bundles the repositories of one store.
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        cars: Arc<dyn CarRepository>,
        service_centers: Arc<dyn ServiceCenterRepository>,
        service_requests: Arc<dyn ServiceRequestRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            customers,
            cars,
            service_centers,
            service_requests,
            unit_of_work,
        }
    }
}
