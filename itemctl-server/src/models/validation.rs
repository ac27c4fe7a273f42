//! Validation error types

use std::fmt;

/// Validation error for request payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field missing, null, or falsy
    Required { field: &'static str },

    /// Field is present but empty
    Empty { field: &'static str },

    /// Field has the wrong JSON type
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    /// Body could not be parsed as JSON
    MalformedBody,

    /// Body parsed, but is not a JSON object
    NotAnObject,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidType { field, expected } => write!(f, "{} must be {}", field, expected),
            Self::MalformedBody => f.write_str("Request body must be valid JSON"),
            Self::NotAnObject => f.write_str("Request body must be a JSON object"),
        }
    }
}

impl std::error::Error for ValidationError {}
