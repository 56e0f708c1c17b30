//! DTOs for service request endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{NewServiceRequest, ServiceRequest, ServiceRequestChanges};

/// Body of `POST /api/requests`.
///
/// `status` defaults to `PENDING` and `created_at` to the time of creation.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub description: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub car_id: i64,
    pub customer_id: i64,
    pub service_center_id: i64,
}

impl From<CreateServiceRequest> for NewServiceRequest {
    fn from(r: CreateServiceRequest) -> Self {
        NewServiceRequest {
            description: r.description,
            status: r.status,
            created_at: r.created_at,
            car_id: r.car_id,
            customer_id: r.customer_id,
            service_center_id: r.service_center_id,
        }
    }
}

/// Body of `PUT /api/requests/{id}`.
///
/// Omitted association ids keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub description: String,
    pub status: String,
    pub car_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub service_center_id: Option<i64>,
}

impl From<UpdateServiceRequest> for ServiceRequestChanges {
    fn from(r: UpdateServiceRequest) -> Self {
        ServiceRequestChanges {
            description: r.description,
            status: r.status,
            car_id: r.car_id,
            customer_id: r.customer_id,
            service_center_id: r.service_center_id,
        }
    }
}

/// Body of `PATCH /api/requests/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceRequestItem {
    pub id: i64,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub car_id: i64,
    pub customer_id: i64,
    pub service_center_id: i64,
}

impl From<ServiceRequest> for ServiceRequestItem {
    fn from(r: ServiceRequest) -> Self {
        ServiceRequestItem {
            id: r.id,
            description: r.description,
            status: r.status,
            created_at: r.created_at,
            car_id: r.car_id,
            customer_id: r.customer_id,
            service_center_id: r.service_center_id,
        }
    }
}
