//! Service request entity.

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::utils::validation::not_blank;

/// A unit of work booked for a car at a service center.
///
/// The request holds the owning side of three associations: it references
/// exactly one car, one customer and one service center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub id: i64,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub car_id: i64,
    pub customer_id: i64,
    pub service_center_id: i64,
}

impl ServiceRequest {
    /// Creates a new ServiceRequest instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        description: String,
        status: String,
        created_at: DateTime<Utc>,
        car_id: i64,
        customer_id: i64,
        service_center_id: i64,
    ) -> Self {
        Self {
            id,
            description,
            status,
            created_at,
            car_id,
            customer_id,
            service_center_id,
        }
    }
}

/// Input data for creating a service request.
///
/// `status` defaults to `PENDING` and `created_at` to the creation time when
/// absent; the coordinator fills both before the row is written.
#[derive(Debug, Clone, Validate)]
pub struct NewServiceRequest {
    #[validate(custom(function = "not_blank", message = "Description cannot be empty"))]
    pub description: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub car_id: i64,
    pub customer_id: i64,
    pub service_center_id: i64,
}

/// Changes applied by a service request update.
///
/// Description and status are always replaced. Association ids left as
/// `None` keep their current value.
#[derive(Debug, Clone, Validate)]
pub struct ServiceRequestChanges {
    #[validate(custom(function = "not_blank", message = "Description cannot be empty"))]
    pub description: String,
    #[validate(custom(function = "not_blank", message = "Status cannot be empty"))]
    pub status: String,
    pub car_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub service_center_id: Option<i64>,
}

impl ServiceRequestChanges {
    /// Applies the changes on top of an existing request.
    pub fn apply_to(&self, current: &ServiceRequest) -> ServiceRequest {
        ServiceRequest {
            id: current.id,
            description: self.description.trim().to_string(),
            status: self.status.trim().to_string(),
            created_at: current.created_at,
            car_id: self.car_id.unwrap_or(current.car_id),
            customer_id: self.customer_id.unwrap_or(current.customer_id),
            service_center_id: self.service_center_id.unwrap_or(current.service_center_id),
        }
    }
}
