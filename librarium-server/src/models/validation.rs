//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Required field is missing or empty
    Empty { field: &'static str },

    /// Numeric field outside its allowed range
    OutOfRange { field: &'static str, min: i64, max: i64 },

    /// Foreign reference does not resolve to an existing entity
    InvalidReference { entity: &'static str },

    /// Request body could not be parsed into the expected shape
    Malformed { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} out of range [{},{}]", field, min, max)
            }
            Self::InvalidReference { entity } => write!(f, "invalid {} reference", entity),
            Self::Malformed { reason } => write!(f, "invalid request body: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}
