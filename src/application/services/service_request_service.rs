//! Service request service.

use std::sync::Arc;

use crate::application::coordinator::ConsistencyCoordinator;
use crate::domain::entities::{NewServiceRequest, ServiceRequest, ServiceRequestChanges};
use crate::error::AppError;
use crate::utils::validation::require_positive_id;

/// Service request operations exposed to the HTTP layer.
pub struct ServiceRequestService {
    coordinator: Arc<ConsistencyCoordinator>,
}

impl ServiceRequestService {
    pub fn new(coordinator: Arc<ConsistencyCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Lists every service request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_all(&self) -> Result<Vec<ServiceRequest>, AppError> {
        self.coordinator.all_service_requests().await
    }

    /// Retrieves a service request by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the request does not exist.
    pub async fn get_by_id(&self, id: i64) -> Result<ServiceRequest, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.find_service_request(id).await
    }

    pub async fn get_by_customer_id(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        require_positive_id("customer_id", customer_id)?;
        self.coordinator.requests_of_customer(customer_id).await
    }

    pub async fn get_by_car_id(&self, car_id: i64) -> Result<Vec<ServiceRequest>, AppError> {
        require_positive_id("car_id", car_id)?;
        self.coordinator.requests_of_car(car_id).await
    }

    pub async fn get_by_service_center_id(
        &self,
        service_center_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        require_positive_id("service_center_id", service_center_id)?;
        self.coordinator
            .requests_of_service_center(service_center_id)
            .await
    }

    /// Creates a request with optional status and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on a blank description.
    /// Returns [`AppError::NotFound`] if the car, customer or center does not exist.
    pub async fn create(&self, input: NewServiceRequest) -> Result<ServiceRequest, AppError> {
        for (field, id) in [
            ("car_id", input.car_id),
            ("customer_id", input.customer_id),
            ("service_center_id", input.service_center_id),
        ] {
            require_positive_id(field, id)?;
        }
        self.coordinator.create_service_request(input).await
    }

    /// Creates a `PENDING` request for a car at a service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on a blank description.
    /// Returns [`AppError::NotFound`] if the car, customer or center does not exist.
    pub async fn create_request(
        &self,
        car_id: i64,
        customer_id: i64,
        service_center_id: i64,
        description: String,
    ) -> Result<ServiceRequest, AppError> {
        self.create(NewServiceRequest {
            description,
            status: None,
            created_at: None,
            car_id,
            customer_id,
            service_center_id,
        })
        .await
    }

    /// Replaces description and status, optionally re-pointing associations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on blank description or status.
    /// Returns [`AppError::NotFound`] if the request or a referenced row does
    /// not exist.
    pub async fn update(
        &self,
        id: i64,
        changes: ServiceRequestChanges,
    ) -> Result<ServiceRequest, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.update_service_request(id, changes).await
    }

    /// Sets the status of a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on a blank status.
    /// Returns [`AppError::NotFound`] if the request does not exist.
    pub async fn update_status(&self, id: i64, status: &str) -> Result<ServiceRequest, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.update_status(id, status).await
    }

    /// Deletes a request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the request does not exist.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        require_positive_id("id", id)?;
        self.coordinator.delete_service_request(id).await
    }
}
