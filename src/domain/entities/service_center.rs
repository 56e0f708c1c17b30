//! Service center entity.

use crate::utils::validation::{PHONE_REGEX, not_blank};
use validator::Validate;

/// A workshop that services requests.
///
/// `name`, `address` and `phone` are each unique in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCenter {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl ServiceCenter {
    /// Creates a new ServiceCenter instance.
    pub fn new(id: i64, name: String, address: String, phone: String) -> Self {
        Self {
            id,
            name,
            address,
            phone,
        }
    }
}

/// Input data for creating or fully replacing a service center.
#[derive(Debug, Clone, Validate)]
pub struct NewServiceCenter {
    #[validate(custom(function = "not_blank", message = "Name must not be blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Address must not be blank"))]
    pub address: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number format"))]
    pub phone: String,
}
