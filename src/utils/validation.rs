//! Shared input validation rules.
//!
//! Field-level rules are attached to the `New*` entity inputs through
//! `validator` derive attributes; the helpers here cover what the derive
//! rules cannot express directly.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use validator::ValidationError;

/// Accepted phone number shape for customers and service centers.
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\-() ]{7,20}$").unwrap());

/// Earliest accepted model year for a car.
pub const MIN_CAR_YEAR: i32 = 1980;

/// Latest accepted model year for a car.
pub const MAX_CAR_YEAR: i32 = 2025;

/// Status assigned to a service request created without one.
pub const DEFAULT_REQUEST_STATUS: &str = "PENDING";

/// Rejects empty and whitespace-only strings.
///
/// Used as a `validator` custom rule.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Ensures an identifier taken from a path or query is positive.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the offending field.
pub fn require_positive_id(field: &'static str, id: i64) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::bad_request(
            format!("{field} must be a positive number"),
            json!({ "field": field, "value": id }),
        ));
    }
    Ok(())
}

/// Ensures a free-form text argument is present.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the offending field.
pub fn require_text(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::bad_request(
            format!("{field} cannot be empty"),
            json!({ "field": field }),
        ));
    }
    Ok(())
}
