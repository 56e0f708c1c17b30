//! DTOs for service center endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{NewServiceCenter, ServiceCenter};

/// Body of `POST /api/service-centers` and `PUT /api/service-centers/{id}`.
#[derive(Debug, Deserialize)]
pub struct ServiceCenterRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl From<ServiceCenterRequest> for NewServiceCenter {
    fn from(r: ServiceCenterRequest) -> Self {
        NewServiceCenter {
            name: r.name,
            address: r.address,
            phone: r.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceCenterItem {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl From<ServiceCenter> for ServiceCenterItem {
    fn from(c: ServiceCenter) -> Self {
        ServiceCenterItem {
            id: c.id,
            name: c.name,
            address: c.address,
            phone: c.phone,
        }
    }
}
