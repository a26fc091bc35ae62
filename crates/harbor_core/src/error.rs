//! Core error types for HARBOR.

use std::fmt;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Argument text is not valid JSON
    InvalidJson { reason: String },

    /// Argument bag has the wrong shape
    InvalidArguments { reason: String },

    /// Unknown access level
    InvalidAccessLevel { value: String },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson { reason } => write!(f, "Invalid JSON: {}", reason),
            Self::InvalidArguments { reason } => write!(f, "Invalid arguments: {}", reason),
            Self::InvalidAccessLevel { value } => write!(f, "invalid access level: {}", value),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson {
            reason: err.to_string(),
        }
    }
}
