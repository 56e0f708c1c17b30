//! Customer entity.

use crate::utils::validation::{PHONE_REGEX, not_blank};
use validator::Validate;

/// A customer of the repair shop.
///
/// The customer row holds no references to its cars or service requests;
/// those associations live on the child rows (`Car::customer_id`,
/// `ServiceRequest::customer_id`) and are exposed as derived views by
/// [`crate::application::graph::RelationshipGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    /// Creates a new Customer instance.
    pub fn new(
        id: i64,
        first_name: String,
        last_name: String,
        email: String,
        phone: String,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            phone,
        }
    }

    /// Returns `"first last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input data for creating or fully replacing a customer.
///
/// `email` and `phone` are unique in the store.
#[derive(Debug, Clone, Validate)]
pub struct NewCustomer {
    #[validate(custom(function = "not_blank", message = "First name is required"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank", message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number format"))]
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewCustomer {
        NewCustomer {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 20 7946 0000".to_string(),
        }
    }

    #[test]
    fn test_customer_creation() {
        let customer = Customer::new(
            7,
            "Ada".to_string(),
            "Lovelace".to_string(),
            "ada@example.com".to_string(),
            "555-0100".to_string(),
        );

        assert_eq!(customer.id, 7);
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_new_customer_valid() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_new_customer_blank_name() {
        let input = NewCustomer {
            first_name: "  ".to_string(),
            ..valid_input()
        };

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_new_customer_invalid_email() {
        let input = NewCustomer {
            email: "not-an-email".to_string(),
            ..valid_input()
        };

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_new_customer_invalid_phone() {
        let input = NewCustomer {
            phone: "abc".to_string(),
            ..valid_input()
        };

        assert!(input.validate().is_err());
    }
}
