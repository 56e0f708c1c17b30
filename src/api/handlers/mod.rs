//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to one resource.

pub mod cars;
pub mod customers;
pub mod health;
pub mod service_centers;
pub mod service_requests;

pub use health::health_handler;
