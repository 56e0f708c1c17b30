use serde_json::json;
use tracing::info;
use validator::Validate;

use super::{
    ConsistencyCoordinator, ensure_unique, find_or_not_found, read_through, warm, write_through,
};
use crate::domain::entities::{NewServiceCenter, ServiceCenter, ServiceRequest};
use crate::domain::relationships::CascadeDeletion;
use crate::error::AppError;
use crate::infrastructure::cache::keys::index;

impl ConsistencyCoordinator {
    /// Lists every service center and warms the cache with the result.
    pub async fn all_service_centers(&self) -> Result<Vec<ServiceCenter>, AppError> {
        let cache = &self.caches().service_centers;
        let ticket = cache.begin();
        let all = self.store().service_centers.find_all().await?;
        warm(cache, ticket, &all);
        Ok(all)
    }

    /// Finds a service center by id, reading through the cache.
    pub async fn find_service_center(&self, id: i64) -> Result<ServiceCenter, AppError> {
        find_or_not_found(
            &self.caches().service_centers,
            "Service center",
            id,
            self.store().service_centers.find_by_id(id),
        )
        .await
    }

    /// Finds a service center by name, reading through the cache.
    pub async fn find_service_center_by_name(&self, name: &str) -> Result<ServiceCenter, AppError> {
        read_through(
            &self.caches().service_centers,
            index::NAME,
            name,
            self.store().service_centers.find_by_name(name),
        )
        .await?
        .ok_or_else(|| AppError::not_found("Service center not found", json!({ "name": name })))
    }

    pub async fn create_service_center(
        &self,
        input: NewServiceCenter,
    ) -> Result<ServiceCenter, AppError> {
        input.validate()?;
        self.check_service_center_keys(&input, None).await?;

        let created = write_through(
            &self.caches().service_centers,
            None,
            self.store().service_centers.create(input),
        )
        .await?;

        info!("Created service center #{}", created.id);
        Ok(created)
    }

    pub async fn update_service_center(
        &self,
        id: i64,
        input: NewServiceCenter,
    ) -> Result<ServiceCenter, AppError> {
        input.validate()?;
        if self.store().service_centers.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(
                "Service center not found",
                json!({ "id": id }),
            ));
        }
        self.check_service_center_keys(&input, Some(id)).await?;

        let updated = write_through(
            &self.caches().service_centers,
            Some(id),
            self.store().service_centers.update(id, input),
        )
        .await?;

        info!("Updated service center #{}", id);
        Ok(updated)
    }

    /// Deletes a service center and the requests it handles. Cars and
    /// customers of those requests are untouched.
    pub async fn delete_service_center(&self, id: i64) -> Result<CascadeDeletion, AppError> {
        let plan = self.plan_service_center_deletion(id).await?;
        let plan = self.execute_deletion(plan).await?;

        info!(
            "Deleted service center #{} with {} service requests",
            id,
            plan.requests.len()
        );
        Ok(plan)
    }

    /// Computes what deleting service center `id` would remove.
    pub async fn plan_service_center_deletion(
        &self,
        id: i64,
    ) -> Result<CascadeDeletion, AppError> {
        let center = self
            .store()
            .service_centers
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Service center not found", json!({ "id": id }))
            })?;

        self.graph().plan_service_center_deletion(center).await
    }

    /// Re-points an existing request to the service center.
    pub async fn add_to_service_center(
        &self,
        center_id: i64,
        request_id: i64,
    ) -> Result<ServiceRequest, AppError> {
        self.require_service_center(center_id).await?;
        let request = self.require_service_request(request_id).await?;

        if request.service_center_id == center_id {
            return Ok(request);
        }

        let moved = ServiceRequest {
            service_center_id: center_id,
            ..request
        };
        let moved = write_through(
            &self.caches().service_requests,
            Some(request_id),
            self.store().service_requests.update(moved),
        )
        .await?;

        info!(
            "Moved service request #{} to service center #{}",
            request_id, center_id
        );
        Ok(moved)
    }

    /// Withdraws a request from the service center.
    ///
    /// A request cannot exist without a center, so it is deleted. Fails with
    /// NotFound when the request belongs to another center.
    pub async fn remove_from_service_center(
        &self,
        center_id: i64,
        request_id: i64,
    ) -> Result<(), AppError> {
        self.require_service_center(center_id).await?;
        let request = self.require_service_request(request_id).await?;

        if request.service_center_id != center_id {
            return Err(AppError::not_found(
                "Service request not found in this service center",
                json!({ "service_center_id": center_id, "request_id": request_id }),
            ));
        }

        let plan = self.graph().plan_request_deletion(request);
        self.execute_deletion(plan).await?;

        info!(
            "Removed service request #{} from service center #{}",
            request_id, center_id
        );
        Ok(())
    }

    pub(super) async fn require_service_center(&self, id: i64) -> Result<ServiceCenter, AppError> {
        self.store()
            .service_centers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service center not found", json!({ "id": id })))
    }

    async fn check_service_center_keys(
        &self,
        input: &NewServiceCenter,
        own_id: Option<i64>,
    ) -> Result<(), AppError> {
        let centers = &self.store().service_centers;

        ensure_unique(
            centers.find_by_name(&input.name).await?,
            own_id,
            "name",
            &input.name,
            "Service center name already exists",
        )?;
        ensure_unique(
            centers.find_by_address(&input.address).await?,
            own_id,
            "address",
            &input.address,
            "Service center address already exists",
        )?;
        ensure_unique(
            centers.find_by_phone(&input.phone).await?,
            own_id,
            "phone",
            &input.phone,
            "Service center phone already exists",
        )
    }
}
