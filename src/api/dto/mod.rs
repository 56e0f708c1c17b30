//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs convert into the validated domain inputs; validation itself
//! runs in the application layer so every entry point shares the same rules.

pub mod car;
pub mod customer;
pub mod deletion;
pub mod health;
pub mod service_center;
pub mod service_request;
