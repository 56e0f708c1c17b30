//! Entity service façades for the HTTP layer.
//!
//! Each service validates path identifiers and delegates to the shared
//! [`ConsistencyCoordinator`](crate::application::coordinator::ConsistencyCoordinator).

pub mod car_service;
pub mod customer_service;
pub mod service_center_service;
pub mod service_request_service;

pub use car_service::{BulkCarResult, CarService};
pub use customer_service::CustomerService;
pub use service_center_service::ServiceCenterService;
pub use service_request_service::ServiceRequestService;
