//! Value types describing multi-row relationship mutations.
//!
//! Plans are computed by [`crate::application::graph::RelationshipGraph`]
//! from the store's current state and executed atomically by a
//! [`crate::domain::repositories::UnitOfWork`].

use crate::domain::entities::{Car, Customer, ServiceCenter, ServiceRequest};

/// The entity whose deletion triggered a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeRoot {
    Customer(Customer),
    Car(Car),
    ServiceCenter(ServiceCenter),
    ServiceRequest(ServiceRequest),
}

impl CascadeRoot {
    /// Entity kind label used in logs and error details.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Customer(_) => "customer",
            Self::Car(_) => "car",
            Self::ServiceCenter(_) => "service_center",
            Self::ServiceRequest(_) => "service_request",
        }
    }

    /// Primary key of the root entity.
    pub fn id(&self) -> i64 {
        match self {
            Self::Customer(c) => c.id,
            Self::Car(c) => c.id,
            Self::ServiceCenter(c) => c.id,
            Self::ServiceRequest(r) => r.id,
        }
    }
}

/// Everything a delete removes, grouped by dependency level.
///
/// Rows are deleted and evicted in field order: `requests` first, then
/// `cars`, then the `root`. Cascades never run sideways: deleting a car
/// removes its requests but leaves their customer and service center alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeDeletion {
    pub requests: Vec<ServiceRequest>,
    pub cars: Vec<Car>,
    pub root: CascadeRoot,
}

impl CascadeDeletion {
    /// Creates a plan that deletes only `root`.
    pub fn root_only(root: CascadeRoot) -> Self {
        Self {
            requests: Vec::new(),
            cars: Vec::new(),
            root,
        }
    }

    /// Ids of the service requests in the plan.
    pub fn request_ids(&self) -> Vec<i64> {
        self.requests.iter().map(|r| r.id).collect()
    }

    /// Ids of the cars in the plan.
    pub fn car_ids(&self) -> Vec<i64> {
        self.cars.iter().map(|c| c.id).collect()
    }

    /// Total number of rows the plan deletes, root included.
    pub fn row_count(&self) -> usize {
        self.requests.len() + self.cars.len() + 1
    }
}

/// Moves a car from one customer to another.
///
/// `from_customer_id` is the owner observed when the plan was made; the
/// store rejects the transfer if the owner changed in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipTransfer {
    pub car_id: i64,
    pub from_customer_id: i64,
    pub to_customer_id: i64,
}

impl OwnershipTransfer {
    /// Returns true when the car already belongs to the target customer.
    pub fn is_noop(&self) -> bool {
        self.from_customer_id == self.to_customer_id
    }
}
