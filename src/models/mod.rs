//! Data models for the tickets machine.
//!
//! Entities are serialized in camelCase for the JSON API.

mod agent;
mod board;
mod requester;
mod ticket;

pub use agent::*;
pub use board::*;
pub use requester::*;
pub use ticket::*;

use crate::errors::AppError;

/// Reject empty (after trim) values of a required field.
pub(crate) fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Reject values longer than `max` characters.
pub(crate) fn max_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
