use chrono::Utc;
use serde_json::json;
use tracing::info;
use validator::Validate;

use super::{ConsistencyCoordinator, find_or_not_found, warm, write_through};
use crate::domain::entities::{NewServiceRequest, ServiceRequest, ServiceRequestChanges};
use crate::error::AppError;
use crate::utils::validation::{DEFAULT_REQUEST_STATUS, require_text};

impl ConsistencyCoordinator {
    /// Lists every service request and warms the cache with the result.
    pub async fn all_service_requests(&self) -> Result<Vec<ServiceRequest>, AppError> {
        let cache = &self.caches().service_requests;
        let ticket = cache.begin();
        let all = self.store().service_requests.find_all().await?;
        warm(cache, ticket, &all);
        Ok(all)
    }

    /// Finds a service request by id, reading through the cache.
    pub async fn find_service_request(&self, id: i64) -> Result<ServiceRequest, AppError> {
        find_or_not_found(
            &self.caches().service_requests,
            "Service request",
            id,
            self.store().service_requests.find_by_id(id),
        )
        .await
    }

    pub async fn requests_of_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        self.find_customer(customer_id).await?;
        self.graph().requests_of_customer(customer_id).await
    }

    pub async fn requests_of_car(&self, car_id: i64) -> Result<Vec<ServiceRequest>, AppError> {
        self.find_car(car_id).await?;
        self.graph().requests_of_car(car_id).await
    }

    pub async fn requests_of_service_center(
        &self,
        service_center_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        self.find_service_center(service_center_id).await?;
        self.graph()
            .requests_of_service_center(service_center_id)
            .await
    }

    /// Files a request. A missing or blank status becomes `PENDING` and a
    /// missing timestamp becomes now.
    pub async fn create_service_request(
        &self,
        mut input: NewServiceRequest,
    ) -> Result<ServiceRequest, AppError> {
        input.validate()?;
        self.check_request_refs(input.car_id, input.customer_id, input.service_center_id)
            .await?;

        input.description = input.description.trim().to_string();
        input.status = Some(
            input
                .status
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_REQUEST_STATUS.to_string()),
        );
        input.created_at = Some(input.created_at.unwrap_or_else(Utc::now));

        let created = write_through(
            &self.caches().service_requests,
            None,
            self.store().service_requests.create(input),
        )
        .await?;

        info!(
            "Created service request #{} for car #{} at service center #{}",
            created.id, created.car_id, created.service_center_id
        );
        Ok(created)
    }

    /// Files a `PENDING` request created now.
    pub async fn create_request(
        &self,
        car_id: i64,
        customer_id: i64,
        service_center_id: i64,
        description: String,
    ) -> Result<ServiceRequest, AppError> {
        self.create_service_request(NewServiceRequest {
            description,
            status: None,
            created_at: None,
            car_id,
            customer_id,
            service_center_id,
        })
        .await
    }

    /// Replaces description and status and re-points any association given.
    /// The creation time never changes.
    pub async fn update_service_request(
        &self,
        id: i64,
        changes: ServiceRequestChanges,
    ) -> Result<ServiceRequest, AppError> {
        changes.validate()?;
        let current = self.require_service_request(id).await?;
        let next = changes.apply_to(&current);
        self.check_request_refs(next.car_id, next.customer_id, next.service_center_id)
            .await?;

        let updated = write_through(
            &self.caches().service_requests,
            Some(id),
            self.store().service_requests.update(next),
        )
        .await?;

        info!("Updated service request #{}", id);
        Ok(updated)
    }

    /// Sets the status token of a request, e.g. `DONE`.
    pub async fn update_status(&self, id: i64, status: &str) -> Result<ServiceRequest, AppError> {
        require_text("status", status)?;
        let current = self.require_service_request(id).await?;

        let next = ServiceRequest {
            status: status.trim().to_string(),
            ..current
        };
        let updated = write_through(
            &self.caches().service_requests,
            Some(id),
            self.store().service_requests.update(next),
        )
        .await?;

        info!("Service request #{} is now {}", id, updated.status);
        Ok(updated)
    }

    pub async fn delete_service_request(&self, id: i64) -> Result<(), AppError> {
        let request = self.require_service_request(id).await?;
        let plan = self.graph().plan_request_deletion(request);
        self.execute_deletion(plan).await?;

        info!("Deleted service request #{}", id);
        Ok(())
    }

    /// Loads a request from the store; writes never start from a cached copy.
    pub(super) async fn require_service_request(
        &self,
        id: i64,
    ) -> Result<ServiceRequest, AppError> {
        self.store()
            .service_requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service request not found", json!({ "id": id })))
    }

    async fn check_request_refs(
        &self,
        car_id: i64,
        customer_id: i64,
        service_center_id: i64,
    ) -> Result<(), AppError> {
        if self.store().cars.find_by_id(car_id).await?.is_none() {
            return Err(AppError::not_found("Car not found", json!({ "id": car_id })));
        }
        if self.store().customers.find_by_id(customer_id).await?.is_none() {
            return Err(AppError::not_found(
                "Customer not found",
                json!({ "id": customer_id }),
            ));
        }
        self.require_service_center(service_center_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::application::coordinator::test_support::Mocks;
    use crate::domain::entities::{
        Car, Customer, NewServiceRequest, ServiceCenter, ServiceRequest, ServiceRequestChanges,
    };
    use crate::error::AppError;
    use chrono::{TimeZone, Utc};

    fn stored(input: NewServiceRequest) -> ServiceRequest {
        ServiceRequest::new(
            20,
            input.description,
            input.status.unwrap_or_default(),
            input.created_at.unwrap_or_default(),
            input.car_id,
            input.customer_id,
            input.service_center_id,
        )
    }

    fn mocks_with_parents() -> Mocks {
        let mut mocks = Mocks::new();
        mocks.cars.expect_find_by_id().returning(|id| {
            Ok(Some(Car::new(
                id,
                "VW".into(),
                "Golf".into(),
                format!("V{id}"),
                2010,
                1,
            )))
        });
        mocks.customers.expect_find_by_id().returning(|id| {
            Ok(Some(Customer::new(
                id,
                "Ann".into(),
                "Lee".into(),
                "a@x.com".into(),
                "555-0100".into(),
            )))
        });
        mocks.service_centers.expect_find_by_id().returning(|id| {
            Ok(Some(ServiceCenter::new(
                id,
                "Fix".into(),
                "123 St".into(),
                "555-0100".into(),
            )))
        });
        mocks
    }

    #[tokio::test]
    async fn test_create_request_defaults_status_and_time() {
        let mut mocks = mocks_with_parents();
        mocks
            .service_requests
            .expect_create()
            .withf(|input| input.status.as_deref() == Some("PENDING") && input.created_at.is_some())
            .returning(|input| Ok(stored(input)));
        let (coordinator, _) = mocks.into_coordinator();

        let created = coordinator
            .create_request(1, 1, 1, "brake check".into())
            .await
            .unwrap();

        assert_eq!(created.status, "PENDING");
    }

    #[tokio::test]
    async fn test_create_request_keeps_given_timestamp() {
        let mut mocks = mocks_with_parents();
        mocks
            .service_requests
            .expect_create()
            .returning(|input| Ok(stored(input)));
        let (coordinator, _) = mocks.into_coordinator();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        let created = coordinator
            .create_service_request(NewServiceRequest {
                description: "oil".into(),
                status: Some("DONE".into()),
                created_at: Some(at),
                car_id: 1,
                customer_id: 1,
                service_center_id: 1,
            })
            .await
            .unwrap();

        assert_eq!(created.created_at, at);
        assert_eq!(created.status, "DONE");
    }

    #[tokio::test]
    async fn test_create_request_with_missing_car_is_not_found() {
        let mut mocks = Mocks::new();
        mocks.cars.expect_find_by_id().returning(|_| Ok(None));
        mocks.service_requests.expect_create().never();
        let (coordinator, _) = mocks.into_coordinator();

        let result = coordinator.create_request(1, 1, 1, "brake check".into()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_blank_status_is_rejected() {
        let (coordinator, _) = Mocks::new().into_coordinator();

        let result = coordinator.update_status(1, "  ").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_status_is_served_from_cache() {
        let created_at = Utc::now();
        let mut mocks = Mocks::new();
        mocks
            .service_requests
            .expect_find_by_id()
            .times(1)
            .returning(move |id| {
                Ok(Some(ServiceRequest::new(
                    id,
                    "brake check".into(),
                    "PENDING".into(),
                    created_at,
                    1,
                    1,
                    1,
                )))
            });
        mocks
            .service_requests
            .expect_update()
            .returning(|request| Ok(request));
        let (coordinator, _) = mocks.into_coordinator();

        coordinator.update_status(5, "DONE").await.unwrap();
        let found = coordinator.find_service_request(5).await.unwrap();

        assert_eq!(found.status, "DONE");
    }

    #[tokio::test]
    async fn test_update_repoints_association() {
        let mut mocks = mocks_with_parents();
        mocks.service_requests.expect_find_by_id().returning(|id| {
            Ok(Some(ServiceRequest::new(
                id,
                "brake check".into(),
                "PENDING".into(),
                Utc::now(),
                1,
                1,
                1,
            )))
        });
        mocks
            .service_requests
            .expect_update()
            .returning(|request| Ok(request));
        let (coordinator, _) = mocks.into_coordinator();

        let updated = coordinator
            .update_service_request(
                5,
                ServiceRequestChanges {
                    description: "brakes and oil".into(),
                    status: "IN_PROGRESS".into(),
                    car_id: Some(2),
                    customer_id: None,
                    service_center_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.car_id, 2);
        assert_eq!(updated.customer_id, 1);
        assert_eq!(updated.status, "IN_PROGRESS");
    }
}
