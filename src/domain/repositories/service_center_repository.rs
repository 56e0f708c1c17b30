//! Repository trait for service center data access.

use crate::domain::entities::{NewServiceCenter, ServiceCenter};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for service centers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgServiceCenterRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceCenterRepository: Send + Sync {
    /// Lists every service center ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all(&self) -> Result<Vec<ServiceCenter>, AppError>;

    /// Finds a service center by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceCenter>, AppError>;

    /// Finds a service center by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_name(&self, name: &str) -> Result<Option<ServiceCenter>, AppError>;

    /// Finds a service center by address.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_address(&self, address: &str) -> Result<Option<ServiceCenter>, AppError>;

    /// Finds a service center by phone number.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<ServiceCenter>, AppError>;

    /// Inserts a service center and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if name, address or phone is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_center: NewServiceCenter) -> Result<ServiceCenter, AppError>;

    /// Replaces every attribute of an existing service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service center does not exist.
    /// Returns [`AppError::Conflict`] if name, address or phone is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, center: NewServiceCenter) -> Result<ServiceCenter, AppError>;
}
