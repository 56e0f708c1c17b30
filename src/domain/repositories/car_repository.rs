//! Repository trait for car data access.

use crate::domain::entities::{Car, NewCar};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for cars.
///
/// The car row is the owning side of the Customer 1:N Car association.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCarRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Lists every car ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all(&self) -> Result<Vec<Car>, AppError>;

    /// Finds a car by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, AppError>;

    /// Finds a car by VIN.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_vin(&self, vin: &str) -> Result<Option<Car>, AppError>;

    /// Lists the cars owned by a customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_customer_id(&self, customer_id: i64) -> Result<Vec<Car>, AppError>;

    /// Inserts a car and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the VIN is already taken or the
    /// owner disappeared.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_car: NewCar) -> Result<Car, AppError>;

    /// Replaces every attribute of an existing car, owner included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the car does not exist.
    /// Returns [`AppError::Conflict`] if the VIN is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, car: NewCar) -> Result<Car, AppError>;
}
