//! Repository trait for customer data access.

use crate::domain::entities::{Customer, NewCustomer};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for customers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCustomerRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Lists every customer ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all(&self) -> Result<Vec<Customer>, AppError>;

    /// Finds a customer by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError>;

    /// Finds a customer by email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError>;

    /// Finds a customer by phone number.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError>;

    /// Inserts a customer and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if email or phone is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError>;

    /// Replaces every attribute of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    /// Returns [`AppError::Conflict`] if email or phone is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, customer: NewCustomer) -> Result<Customer, AppError>;
}
