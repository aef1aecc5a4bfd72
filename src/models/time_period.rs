//! Time window applied to saved searches.

use thiserror::Error;

/// Default time period of a demo session, in days.
pub const ONE_YEAR: i32 = 365;

/// Allowed values for `saved_search_time_period`, in days. `None` is also valid.
pub const VALID_TIME_PERIODS: [i32; 6] = [1, 3, 7, 14, 30, ONE_YEAR];

/// A rejected value, scoped to the field that carried it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn invalid(field: &'static str) -> Self {
        Self {
            field,
            message: "is invalid".to_string(),
        }
    }

    #[must_use]
    pub fn out_of_range(field: &'static str) -> Self {
        Self {
            field,
            message: "is out of range".to_string(),
        }
    }
}

pub fn validate_time_period(value: Option<i32>) -> Result<Option<i32>, FieldError> {
    match value {
        None => Ok(None),
        Some(days) if VALID_TIME_PERIODS.contains(&days) => Ok(Some(days)),
        Some(_) => Err(FieldError::invalid("saved_search_time_period")),
    }
}
