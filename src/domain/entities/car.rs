//! Car entity.

use crate::utils::validation::not_blank;
use validator::Validate;

/// A car owned by exactly one customer.
///
/// `customer_id` is the owning side of the Customer 1:N Car association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub vin: String,
    pub year: i32,
    pub customer_id: i64,
}

impl Car {
    /// Creates a new Car instance.
    pub fn new(
        id: i64,
        brand: String,
        model: String,
        vin: String,
        year: i32,
        customer_id: i64,
    ) -> Self {
        Self {
            id,
            brand,
            model,
            vin,
            year,
            customer_id,
        }
    }
}

/// Input data for creating or fully replacing a car.
///
/// `vin` is unique in the store; `customer_id` must reference an existing
/// customer.
#[derive(Debug, Clone, Validate)]
pub struct NewCar {
    #[validate(custom(function = "not_blank", message = "Brand must not be blank"))]
    pub brand: String,
    #[validate(custom(function = "not_blank", message = "Model must not be blank"))]
    pub model: String,
    #[validate(custom(function = "not_blank", message = "VIN must not be blank"))]
    pub vin: String,
    #[validate(range(min = 1980, max = 2025, message = "Year must be between 1980 and 2025"))]
    pub year: i32,
    pub customer_id: i64,
}
