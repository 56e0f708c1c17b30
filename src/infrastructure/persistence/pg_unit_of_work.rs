//! PostgreSQL implementation of the multi-row transactional mutations.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::debug;

use super::pg_car_repository::CAR_COLUMNS;
use super::pg_service_request_repository::REQUEST_COLUMNS;
use super::rows::{CarRow, ServiceRequestRow};
use crate::domain::entities::{Car, ServiceRequest};
use crate::domain::relationships::{CascadeDeletion, CascadeRoot, OwnershipTransfer};
use crate::domain::repositories::UnitOfWork;
use crate::error::AppError;

/// Runs cascading deletes and ownership transfers in a single transaction.
///
/// The schema has no `ON DELETE CASCADE`: a cascade locks its root row and
/// collects the children under that lock, so rows attached after the plan
/// was computed are deleted and reported too.
pub struct PgUnitOfWork {
    pool: Arc<PgPool>,
}

impl PgUnitOfWork {
    /// Creates a new unit of work with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn root_table(root: &CascadeRoot) -> &'static str {
    match root {
        CascadeRoot::Customer(_) => "customers",
        CascadeRoot::Car(_) => "cars",
        CascadeRoot::ServiceCenter(_) => "service_centers",
        CascadeRoot::ServiceRequest(_) => "service_requests",
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn delete_cascade(&self, plan: &CascadeDeletion) -> Result<CascadeDeletion, AppError> {
        let mut tx = self.pool.begin().await?;
        let root_id = plan.root.id();

        // Inserts referencing the root wait on this lock until commit.
        let locked: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM {} WHERE id = $1 FOR UPDATE",
            root_table(&plan.root)
        ))
        .bind(root_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Err(AppError::not_found(
                format!("{} not found", plan.root.kind()),
                json!({ "id": root_id }),
            ));
        }

        let cars: Vec<Car> = match plan.root {
            CascadeRoot::Customer(_) => sqlx::query_as::<_, CarRow>(&format!(
                "SELECT {CAR_COLUMNS} FROM cars WHERE customer_id = $1 ORDER BY id FOR UPDATE"
            ))
            .bind(root_id)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(Into::into)
            .collect(),
            _ => Vec::new(),
        };
        let car_ids: Vec<i64> = cars.iter().map(|c| c.id).collect();

        let request_query = |filter: &str| {
            format!(
                "SELECT {REQUEST_COLUMNS} FROM service_requests WHERE {filter} ORDER BY id FOR UPDATE"
            )
        };
        let request_rows: Vec<ServiceRequestRow> = match plan.root {
            CascadeRoot::Customer(_) => {
                sqlx::query_as(&request_query("customer_id = $1 OR car_id = ANY($2)"))
                    .bind(root_id)
                    .bind(&car_ids)
                    .fetch_all(&mut *tx)
                    .await?
            }
            CascadeRoot::Car(_) => {
                sqlx::query_as(&request_query("car_id = $1"))
                    .bind(root_id)
                    .fetch_all(&mut *tx)
                    .await?
            }
            CascadeRoot::ServiceCenter(_) => {
                sqlx::query_as(&request_query("service_center_id = $1"))
                    .bind(root_id)
                    .fetch_all(&mut *tx)
                    .await?
            }
            CascadeRoot::ServiceRequest(_) => Vec::new(),
        };
        let requests: Vec<ServiceRequest> = request_rows.into_iter().map(Into::into).collect();

        if !requests.is_empty() {
            sqlx::query("DELETE FROM service_requests WHERE id = ANY($1)")
                .bind(requests.iter().map(|r| r.id).collect::<Vec<i64>>())
                .execute(&mut *tx)
                .await?;
        }
        if !car_ids.is_empty() {
            sqlx::query("DELETE FROM cars WHERE id = ANY($1)")
                .bind(&car_ids)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            root_table(&plan.root)
        ))
        .bind(root_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let done = CascadeDeletion {
            requests,
            cars,
            root: plan.root.clone(),
        };
        if done.row_count() != plan.row_count() {
            debug!(
                "Cascade of {} #{} deleted {} rows, {} planned",
                plan.root.kind(),
                root_id,
                done.row_count(),
                plan.row_count()
            );
        }
        Ok(done)
    }

    async fn transfer_car(&self, transfer: OwnershipTransfer) -> Result<Car, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock both owners in id order so concurrent transfers cannot deadlock.
        let locked: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM customers WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(vec![transfer.from_customer_id, transfer.to_customer_id])
        .fetch_all(&mut *tx)
        .await?;

        if !locked.contains(&transfer.to_customer_id) {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Customer not found",
                json!({ "id": transfer.to_customer_id }),
            ));
        }

        let row = sqlx::query_as::<_, CarRow>(&format!(
            r#"
            UPDATE cars SET customer_id = $3
            WHERE id = $1 AND customer_id = $2
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(transfer.car_id)
        .bind(transfer.from_customer_id)
        .bind(transfer.to_customer_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM cars WHERE id = $1")
                .bind(transfer.car_id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Err(match exists {
                Some(_) => AppError::conflict(
                    "Car owner changed concurrently",
                    json!({
                        "car_id": transfer.car_id,
                        "expected_owner": transfer.from_customer_id,
                    }),
                ),
                None => AppError::not_found("Car not found", json!({ "id": transfer.car_id })),
            });
        };

        tx.commit().await?;
        Ok(row.into())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
