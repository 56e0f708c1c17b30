//! Repository trait for service request data access.

use crate::domain::entities::{NewServiceRequest, ServiceRequest};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for service requests.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgServiceRequestRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    /// Lists every service request ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all(&self) -> Result<Vec<ServiceRequest>, AppError>;

    /// Finds a service request by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceRequest>, AppError>;

    /// Lists the requests filed for a customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_customer_id(&self, customer_id: i64)
    -> Result<Vec<ServiceRequest>, AppError>;

    /// Lists the requests filed for a car.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_car_id(&self, car_id: i64) -> Result<Vec<ServiceRequest>, AppError>;

    /// Lists the requests handled by a service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_service_center_id(
        &self,
        service_center_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError>;

    /// Inserts a service request and returns the stored row.
    ///
    /// `status` and `created_at` fall back to `PENDING` and the current
    /// time when absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a referenced row disappeared.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_request: NewServiceRequest) -> Result<ServiceRequest, AppError>;

    /// Writes description, status and the three associations of `request`.
    ///
    /// `created_at` is immutable and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the request does not exist.
    /// Returns [`AppError::Conflict`] if a referenced row disappeared.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, request: ServiceRequest) -> Result<ServiceRequest, AppError>;
}
