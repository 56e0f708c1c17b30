//! PostgreSQL implementation of customer repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::CustomerRow;
use crate::domain::entities::{Customer, NewCustomer};
use crate::domain::repositories::CustomerRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, first_name, last_name, email, phone";

/// PostgreSQL repository for customers.
pub struct PgCustomerRepository {
    pool: Arc<PgPool>,
}

impl PgCustomerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_one_by(&self, column: &str, value: &str) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {COLUMNS} FROM customers WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Customer::from))
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, AppError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {COLUMNS} FROM customers ORDER BY id"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        self.find_one_by("email", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, AppError> {
        self.find_one_by("phone", phone).await
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            INSERT INTO customers (first_name, last_name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new_customer.first_name)
        .bind(new_customer.last_name)
        .bind(new_customer.email)
        .bind(new_customer.phone)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, customer: NewCustomer) -> Result<Customer, AppError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            UPDATE customers SET
                first_name = $2,
                last_name  = $3,
                email      = $4,
                phone      = $5
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(customer.first_name)
        .bind(customer.last_name)
        .bind(customer.email)
        .bind(customer.phone)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
