//! Customer service.

use std::sync::Arc;

use crate::application::coordinator::ConsistencyCoordinator;
use crate::domain::entities::{Car, Customer, NewCustomer};
use crate::domain::relationships::CascadeDeletion;
use crate::error::AppError;
use crate::utils::validation::require_positive_id;

/// Customer operations exposed to the HTTP layer.
pub struct CustomerService {
    coordinator: Arc<ConsistencyCoordinator>,
}

impl CustomerService {
    pub fn new(coordinator: Arc<ConsistencyCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Lists every customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_all(&self) -> Result<Vec<Customer>, AppError> {
        self.coordinator.all_customers().await
    }

    /// Retrieves a customer by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `id` is not positive.
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    pub async fn get_by_id(&self, id: i64) -> Result<Customer, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.find_customer(id).await
    }

    /// Retrieves a customer by email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no customer has this email.
    pub async fn get_by_email(&self, email: &str) -> Result<Customer, AppError> {
        self.coordinator.find_customer_by_email(email).await
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on invalid input.
    /// Returns [`AppError::Conflict`] if the email or phone is taken.
    pub async fn create(&self, input: NewCustomer) -> Result<Customer, AppError> {
        self.coordinator.create_customer(input).await
    }

    /// Replaces a customer's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on invalid input.
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    /// Returns [`AppError::Conflict`] if the email or phone is taken by
    /// another customer.
    pub async fn update(&self, id: i64, input: NewCustomer) -> Result<Customer, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.update_customer(id, input).await
    }

    /// Deletes a customer with its cars and service requests.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    pub async fn delete(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.delete_customer(id).await
    }

    /// Cars owned by the customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    pub async fn get_cars(&self, id: i64) -> Result<Vec<Car>, AppError> {
        require_positive_id("customer_id", id)?;
        self.coordinator.cars_of_customer(id).await
    }
}
