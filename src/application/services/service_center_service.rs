//! Service center service.

use std::sync::Arc;

use crate::application::coordinator::ConsistencyCoordinator;
use crate::domain::entities::{NewServiceCenter, ServiceCenter, ServiceRequest};
use crate::domain::relationships::CascadeDeletion;
use crate::error::AppError;
use crate::utils::validation::require_positive_id;

/// Service center operations exposed to the HTTP layer.
pub struct ServiceCenterService {
    coordinator: Arc<ConsistencyCoordinator>,
}

impl ServiceCenterService {
    pub fn new(coordinator: Arc<ConsistencyCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Lists every service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_all(&self) -> Result<Vec<ServiceCenter>, AppError> {
        self.coordinator.all_service_centers().await
    }

    /// Retrieves a service center by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service center does not exist.
    pub async fn get_by_id(&self, id: i64) -> Result<ServiceCenter, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.find_service_center(id).await
    }

    /// Retrieves a service center by its unique name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no service center has this name.
    pub async fn get_by_name(&self, name: &str) -> Result<ServiceCenter, AppError> {
        self.coordinator.find_service_center_by_name(name).await
    }

    /// Creates a service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] on invalid input.
    /// Returns [`AppError::Conflict`] if the name, address or phone is taken.
    pub async fn create(&self, input: NewServiceCenter) -> Result<ServiceCenter, AppError> {
        self.coordinator.create_service_center(input).await
    }

    /// Replaces a service center's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service center does not exist.
    /// Returns [`AppError::Conflict`] if a natural key is taken by another center.
    pub async fn update(
        &self,
        id: i64,
        input: NewServiceCenter,
    ) -> Result<ServiceCenter, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.update_service_center(id, input).await
    }

    /// Deletes a service center and the requests it handles.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service center does not exist.
    pub async fn delete(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        require_positive_id("id", id)?;
        self.coordinator.delete_service_center(id).await
    }

    /// Requests handled by the service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service center does not exist.
    pub async fn get_requests(&self, id: i64) -> Result<Vec<ServiceRequest>, AppError> {
        require_positive_id("service_center_id", id)?;
        self.coordinator.requests_of_service_center(id).await
    }

    /// Assigns an existing request to the service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the center or the request does not exist.
    pub async fn add_to_service_center(
        &self,
        center_id: i64,
        request_id: i64,
    ) -> Result<ServiceRequest, AppError> {
        require_positive_id("service_center_id", center_id)?;
        require_positive_id("request_id", request_id)?;
        self.coordinator
            .add_to_service_center(center_id, request_id)
            .await
    }

    /// Withdraws (deletes) a request handled by the service center.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the center or the request does not
    /// exist, or the request belongs to another center.
    pub async fn remove_from_service_center(
        &self,
        center_id: i64,
        request_id: i64,
    ) -> Result<(), AppError> {
        require_positive_id("service_center_id", center_id)?;
        require_positive_id("request_id", request_id)?;
        self.coordinator
            .remove_from_service_center(center_id, request_id)
            .await
    }
}
