//! PostgreSQL implementation of car repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::CarRow;
use crate::domain::entities::{Car, NewCar};
use crate::domain::repositories::CarRepository;
use crate::error::AppError;

pub(crate) const CAR_COLUMNS: &str = "id, brand, model, vin, year, customer_id";

/// PostgreSQL repository for cars.
pub struct PgCarRepository {
    pool: Arc<PgPool>,
}

impl PgCarRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarRepository for PgCarRepository {
    async fn find_all(&self) -> Result<Vec<Car>, AppError> {
        let rows = sqlx::query_as::<_, CarRow>(&format!(
            "SELECT {CAR_COLUMNS} FROM cars ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, AppError> {
        let row = sqlx::query_as::<_, CarRow>(&format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Car::from))
    }

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Car>, AppError> {
        let row = sqlx::query_as::<_, CarRow>(&format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE vin = $1"
        ))
        .bind(vin)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Car::from))
    }

    async fn find_by_customer_id(&self, customer_id: i64) -> Result<Vec<Car>, AppError> {
        let rows = sqlx::query_as::<_, CarRow>(&format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn create(&self, new_car: NewCar) -> Result<Car, AppError> {
        let row = sqlx::query_as::<_, CarRow>(&format!(
            r#"
            INSERT INTO cars (brand, model, vin, year, customer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(new_car.brand)
        .bind(new_car.model)
        .bind(new_car.vin)
        .bind(new_car.year)
        .bind(new_car.customer_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, car: NewCar) -> Result<Car, AppError> {
        let row = sqlx::query_as::<_, CarRow>(&format!(
            r#"
            UPDATE cars SET
                brand       = $2,
                model       = $3,
                vin         = $4,
                year        = $5,
                customer_id = $6
            WHERE id = $1
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(car.brand)
        .bind(car.model)
        .bind(car.vin)
        .bind(car.year)
        .bind(car.customer_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
