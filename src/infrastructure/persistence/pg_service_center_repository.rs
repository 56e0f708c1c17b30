//! PostgreSQL implementation of service center repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::ServiceCenterRow;
use crate::domain::entities::{NewServiceCenter, ServiceCenter};
use crate::domain::repositories::ServiceCenterRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, name, address, phone";

/// PostgreSQL repository for service centers.
pub struct PgServiceCenterRepository {
    pool: Arc<PgPool>,
}

impl PgServiceCenterRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_one_by(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<ServiceCenter>, AppError> {
        let row = sqlx::query_as::<_, ServiceCenterRow>(&format!(
            "SELECT {COLUMNS} FROM service_centers WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ServiceCenter::from))
    }
}

#[async_trait]
impl ServiceCenterRepository for PgServiceCenterRepository {
    async fn find_all(&self) -> Result<Vec<ServiceCenter>, AppError> {
        let rows = sqlx::query_as::<_, ServiceCenterRow>(&format!(
            "SELECT {COLUMNS} FROM service_centers ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ServiceCenter::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ServiceCenter>, AppError> {
        let row = sqlx::query_as::<_, ServiceCenterRow>(&format!(
            "SELECT {COLUMNS} FROM service_centers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ServiceCenter::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ServiceCenter>, AppError> {
        self.find_one_by("name", name).await
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<ServiceCenter>, AppError> {
        self.find_one_by("address", address).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ServiceCenter>, AppError> {
        self.find_one_by("phone", phone).await
    }

    async fn create(&self, new_center: NewServiceCenter) -> Result<ServiceCenter, AppError> {
        let row = sqlx::query_as::<_, ServiceCenterRow>(&format!(
            r#"
            INSERT INTO service_centers (name, address, phone)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new_center.name)
        .bind(new_center.address)
        .bind(new_center.phone)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, center: NewServiceCenter) -> Result<ServiceCenter, AppError> {
        let row = sqlx::query_as::<_, ServiceCenterRow>(&format!(
            r#"
            UPDATE service_centers SET
                name    = $2,
                address = $3,
                phone   = $4
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(center.name)
        .bind(center.address)
        .bind(center.phone)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
