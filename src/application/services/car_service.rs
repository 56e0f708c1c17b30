//! Car service.

use std::sync::Arc;
use tracing::info;

use crate::application::coordinator::ConsistencyCoordinator;
use crate::domain::entities::{Car, NewCar};
use crate::domain::relationships::CascadeDeletion;
use crate::error::AppError;
use crate::utils::validation::require_positive_id;

/// Per-item outcome of a bulk create.
#[derive(Debug)]
pub enum BulkCarResult {
    Created { car: Car },
    Skipped { vin: String, reason: String },
    Failed {
        vin: String,
        code: &'static str,
        message: String,
    },
}

/// Car operations exposed to the HTTP layer.
pub struct CarService {
    coordinator: Arc<ConsistencyCoordinator>,
}

impl CarService {
    pub fn new(coordinator: Arc<ConsistencyCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Lists every car.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_all(&self) -> Result<Vec<Car>, AppError> {
        self.coordinator.all_cars().await
    }

    /// Retrieves a car by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the car does not exist.
    pub async fn get_by_id(&self, id: i64) -> Result<Car, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.find_car(id).await
    }

    /// Retrieves a car by VIN.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no car has this VIN.
    pub async fn get_by_vin(&self, vin: &str) -> Result<Car, AppError> {
        self.coordinator.find_car_by_vin(vin).await
    }

    /// Cars owned by a customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the customer does not exist.
    pub async fn get_cars_by_customer_id(&self, customer_id: i64) -> Result<Vec<Car>, AppError> {
        require_positive_id("customer_id", customer_id)?;
        self.coordinator.cars_of_customer(customer_id).await
    }

    /// Creates a car for an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on invalid input.
    /// Returns [`AppError::NotFound`] if the owner does not exist.
    /// Returns [`AppError::Conflict`] if the VIN is taken.
    pub async fn create(&self, input: NewCar) -> Result<Car, AppError> {
        self.coordinator.create_car(input).await
    }

    /// Creates several cars, each through the normal create path.
    ///
    /// With `year_filter`, items of any other model year are skipped. One
    /// failing item does not stop the others.
    pub async fn create_bulk(
        &self,
        items: Vec<NewCar>,
        year_filter: Option<i32>,
    ) -> Vec<BulkCarResult> {
        let mut results = Vec::with_capacity(items.len());

        for item in items {
            if let Some(year) = year_filter
                && item.year != year
            {
                results.push(BulkCarResult::Skipped {
                    vin: item.vin,
                    reason: format!("year {} does not match filter {}", item.year, year),
                });
                continue;
            }

            let vin = item.vin.clone();
            results.push(match self.coordinator.create_car(item).await {
                Ok(car) => BulkCarResult::Created { car },
                Err(e) => BulkCarResult::Failed {
                    vin,
                    code: e.code(),
                    message: e.to_string(),
                },
            });
        }

        let created = results
            .iter()
            .filter(|r| matches!(r, BulkCarResult::Created { .. }))
            .count();
        info!("Bulk create: {} of {} cars created", created, results.len());
        results
    }

    /// Replaces a car's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the car or the new owner does not exist.
    /// Returns [`AppError::Conflict`] if the VIN is taken by another car.
    pub async fn update(&self, id: i64, input: NewCar) -> Result<Car, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.update_car(id, input).await
    }

    /// Deletes a car and its service requests.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the car does not exist.
    pub async fn delete(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.delete_car(id).await
    }

    /// Moves a car to another customer.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the car or the new owner does not exist.
    /// Returns [`AppError::Conflict`] if the car changed owner concurrently.
    pub async fn transfer_ownership(
        &self,
        car_id: i64,
        new_customer_id: i64,
    ) -> Result<Car, AppError> {
        require_positive_id("car_id", car_id)?;
        require_positive_id("customer_id", new_customer_id)?;
        self.coordinator
            .transfer_ownership(car_id, new_customer_id)
            .await
    }
}
