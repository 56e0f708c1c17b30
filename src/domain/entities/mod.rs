//! Core domain entities of the repair shop.
//!
//! Entities are plain data structures. Associations are one-directional: a
//! child row holds its parent's id and nothing points back. Reverse views
//! ("cars of customer X") are derived on demand.
//!
//! # Entity Types
//!
//! - [`Customer`] - owns cars and service requests
//! - [`Car`] - belongs to one customer
//! - [`ServiceCenter`] - services requests
//! - [`ServiceRequest`] - references one car, one customer and one center
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for input:
//! - `NewCustomer`, `NewCar`, `NewServiceCenter`, `NewServiceRequest` - validated input
//! - `ServiceRequestChanges` - partial update of a request

pub mod car;
pub mod customer;
pub mod service_center;
pub mod service_request;

pub use car::{Car, NewCar};
pub use customer::{Customer, NewCustomer};
pub use service_center::{NewServiceCenter, ServiceCenter};
pub use service_request::{NewServiceRequest, ServiceRequest, ServiceRequestChanges};
