//! DTOs for customer endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Customer, NewCustomer};

/// Body of `POST /api/customers` and `PUT /api/customers/{id}`.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<CustomerRequest> for NewCustomer {
    fn from(r: CustomerRequest) -> Self {
        NewCustomer {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerItem {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<Customer> for CustomerItem {
    fn from(c: Customer) -> Self {
        CustomerItem {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone: c.phone,
        }
    }
}
