//! Shared validation helpers.
//!
//! - [`validation`] - Field rules and the domain constants they check against

pub mod validation;
