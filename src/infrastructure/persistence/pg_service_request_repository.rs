//! PostgreSQL implementation of service request repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::ServiceRequestRow;
use crate::domain::entities::{NewServiceRequest, ServiceRequest};
use crate::domain::repositories::ServiceRequestRepository;
use crate::error::AppError;
use crate::utils::validation::DEFAULT_REQUEST_STATUS;

pub(crate) const REQUEST_COLUMNS: &str =
    "id, description, status, created_at, car_id, customer_id, service_center_id";

/// PostgreSQL repository for service requests.
pub struct PgServiceRequestRepository {
    pool: Arc<PgPool>,
}

impl PgServiceRequestRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_many_by(
        &self,
        column: &str,
        parent_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        let rows = sqlx::query_as::<_, ServiceRequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM service_requests WHERE {column} = $1 ORDER BY id"
        ))
        .bind(parent_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ServiceRequest::from).collect())
    }
}

#[async_trait]
impl ServiceRequestRepository for PgServiceRequestRepository {
    async fn find_all(&self) -> Result<Vec<ServiceRequest>, AppError> {
        let rows = sqlx::query_as::<_, ServiceRequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM service_requests ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ServiceRequest::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceRequest>, AppError> {
        let row = sqlx::query_as::<_, ServiceRequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM service_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ServiceRequest::from))
    }

    async fn find_by_customer_id(
        &self,
        customer_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        self.find_many_by("customer_id", customer_id).await
    }

    async fn find_by_car_id(&self, car_id: i64) -> Result<Vec<ServiceRequest>, AppError> {
        self.find_many_by("car_id", car_id).await
    }

    async fn find_by_service_center_id(
        &self,
        service_center_id: i64,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        self.find_many_by("service_center_id", service_center_id)
            .await
    }

    async fn create(&self, new_request: NewServiceRequest) -> Result<ServiceRequest, AppError> {
        let row = sqlx::query_as::<_, ServiceRequestRow>(&format!(
            r#"
            INSERT INTO service_requests
                (description, status, created_at, car_id, customer_id, service_center_id)
            VALUES ($1, COALESCE($2, $3), COALESCE($4, NOW()), $5, $6, $7)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(new_request.description)
        .bind(new_request.status)
        .bind(DEFAULT_REQUEST_STATUS)
        .bind(new_request.created_at)
        .bind(new_request.car_id)
        .bind(new_request.customer_id)
        .bind(new_request.service_center_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, request: ServiceRequest) -> Result<ServiceRequest, AppError> {
        let row = sqlx::query_as::<_, ServiceRequestRow>(&format!(
            r#"
            UPDATE service_requests SET
                description       = $2,
                status            = $3,
                car_id            = $4,
                customer_id       = $5,
                service_center_id = $6
            WHERE id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request.id)
        .bind(request.description)
        .bind(request.status)
        .bind(request.car_id)
        .bind(request.customer_id)
        .bind(request.service_center_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
