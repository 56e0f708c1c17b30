//! Access paths declared by each entity kind.

use super::indexed_cache::{Cacheable, GroupKey, IndexKey};
use crate::domain::entities::{Car, Customer, ServiceCenter, ServiceRequest};

/// Natural-key index names.
pub mod index {
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const VIN: &str = "vin";
    pub const NAME: &str = "name";
    pub const ADDRESS: &str = "address";
}

/// Foreign-key group names, one per parent kind.
pub mod group {
    pub const CUSTOMER: &str = "customer";
    pub const CAR: &str = "car";
    pub const SERVICE_CENTER: &str = "service_center";
}

impl Cacheable for Customer {
    fn id(&self) -> i64 {
        self.id
    }

    fn natural_keys(&self) -> Vec<IndexKey> {
        vec![
            IndexKey::new(index::EMAIL, self.email.clone()),
            IndexKey::new(index::PHONE, self.phone.clone()),
        ]
    }
}

impl Cacheable for Car {
    fn id(&self) -> i64 {
        self.id
    }

    fn natural_keys(&self) -> Vec<IndexKey> {
        vec![IndexKey::new(index::VIN, self.vin.clone())]
    }

    fn group_keys(&self) -> Vec<GroupKey> {
        vec![GroupKey::new(group::CUSTOMER, self.customer_id)]
    }
}

impl Cacheable for ServiceCenter {
    fn id(&self) -> i64 {
        self.id
    }

    fn natural_keys(&self) -> Vec<IndexKey> {
        vec![
            IndexKey::new(index::NAME, self.name.clone()),
            IndexKey::new(index::ADDRESS, self.address.clone()),
            IndexKey::new(index::PHONE, self.phone.clone()),
        ]
    }
}

impl Cacheable for ServiceRequest {
    fn id(&self) -> i64 {
        self.id
    }

    fn group_keys(&self) -> Vec<GroupKey> {
        vec![
            GroupKey::new(group::CUSTOMER, self.customer_id),
            GroupKey::new(group::CAR, self.car_id),
            GroupKey::new(group::SERVICE_CENTER, self.service_center_id),
        ]
    }
}
