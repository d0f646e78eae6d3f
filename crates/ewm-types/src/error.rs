//! Errors raised while reading request parameters.

use thiserror::Error;

/// A request parameter was missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A required parameter was not supplied.
    #[error("required parameter '{name}' is missing")]
    Missing { name: String },

    /// A parameter could not be parsed.
    #[error("parameter '{name}' has invalid value '{value}'")]
    Invalid { name: String, value: String },

    /// A parameter parsed but is outside its allowed range.
    #[error("parameter '{name}' {reason}")]
    OutOfRange { name: String, reason: String },
}

impl ParamError {
    pub(crate) fn missing(name: &str) -> Self {
        Self::Missing {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid(name: &str, value: &str) -> Self {
        Self::Invalid {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range(name: &str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
