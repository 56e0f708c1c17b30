//! DTOs for car endpoints.

use serde::{Deserialize, Serialize};

use crate::application::services::BulkCarResult;
use crate::domain::entities::{Car, NewCar};

/// Body of `POST /api/cars` and `PUT /api/cars/{id}`.
#[derive(Debug, Deserialize)]
pub struct CarRequest {
    pub brand: String,
    pub model: String,
    pub vin: String,
    pub year: i32,
    pub customer_id: i64,
}

impl From<CarRequest> for NewCar {
    fn from(r: CarRequest) -> Self {
        NewCar {
            brand: r.brand,
            model: r.model,
            vin: r.vin,
            year: r.year,
            customer_id: r.customer_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CarItem {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub vin: String,
    pub year: i32,
    pub customer_id: i64,
}

impl From<Car> for CarItem {
    fn from(c: Car) -> Self {
        CarItem {
            id: c.id,
            brand: c.brand,
            model: c.model,
            vin: c.vin,
            year: c.year,
            customer_id: c.customer_id,
        }
    }
}

/// Query of `POST /api/cars/bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkQuery {
    pub year_filter: Option<i32>,
}

/// Body of `PUT /api/cars/{id}/owner`.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub customer_id: i64,
}

/// Per-item result of a bulk create.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkItem {
    Created {
        car: CarItem,
    },
    Skipped {
        vin: String,
        reason: String,
    },
    Failed {
        vin: String,
        code: String,
        message: String,
    },
}

impl From<BulkCarResult> for BulkItem {
    fn from(r: BulkCarResult) -> Self {
        match r {
            BulkCarResult::Created { car } => BulkItem::Created { car: car.into() },
            BulkCarResult::Skipped { vin, reason } => BulkItem::Skipped { vin, reason },
            BulkCarResult::Failed { vin, code, message } => BulkItem::Failed {
                vin,
                code: code.to_string(),
                message,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkResponse {
    pub created: usize,
    pub items: Vec<BulkItem>,
}
