use thiserror::Error;

use super::form::FieldId;

/// Rejected user input. Always recovered locally: the loop keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field}: {text:?} is not a number")]
    InvalidNumber { field: FieldId, text: String },
    #[error("{field}: mass must be positive, got {value}")]
    NonPositiveMass { field: FieldId, value: f64 },
}

impl InputError {
    pub fn field(&self) -> FieldId {
        match self {
            InputError::InvalidNumber { field, .. } | InputError::NonPositiveMass { field, .. } => *field,
        }
    }
}

/// Parses a committed text buffer. Surrounding whitespace is ignored and
/// non-finite values are rejected.
pub fn parse_number(field: FieldId, text: &str) -> Result<f64, InputError> {
    let invalid = || InputError::InvalidNumber {
        field,
        text: text.to_string(),
    };
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}
