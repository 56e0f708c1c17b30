//! Row shapes returned by the SQL queries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::entities::{Car, Customer, ServiceCenter, ServiceRequest};

#[derive(FromRow)]
pub(crate) struct CustomerRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Customer::new(r.id, r.first_name, r.last_name, r.email, r.phone)
    }
}

#[derive(FromRow)]
pub(crate) struct CarRow {
    id: i64,
    brand: String,
    model: String,
    vin: String,
    year: i32,
    customer_id: i64,
}

impl From<CarRow> for Car {
    fn from(r: CarRow) -> Self {
        Car::new(r.id, r.brand, r.model, r.vin, r.year, r.customer_id)
    }
}

#[derive(FromRow)]
pub(crate) struct ServiceCenterRow {
    id: i64,
    name: String,
    address: String,
    phone: String,
}

impl From<ServiceCenterRow> for ServiceCenter {
    fn from(r: ServiceCenterRow) -> Self {
        ServiceCenter::new(r.id, r.name, r.address, r.phone)
    }
}

#[derive(FromRow)]
pub(crate) struct ServiceRequestRow {
    id: i64,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    car_id: i64,
    customer_id: i64,
    service_center_id: i64,
}

impl From<ServiceRequestRow> for ServiceRequest {
    fn from(r: ServiceRequestRow) -> Self {
        ServiceRequest::new(
            r.id,
            r.description,
            r.status,
            r.created_at,
            r.car_id,
            r.customer_id,
            r.service_center_id,
        )
    }
}
