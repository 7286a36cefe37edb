//! Structured error types for hopeboard-core.
//!
//! Uses `thiserror` so the server and client crates can compose these
//! into their own error enums. The CLI wraps everything in `anyhow`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::ValidationError;

/// Main error type for hopeboard-core operations
#[derive(Error, Debug)]
pub enum HopeError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Domain validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Config file could not be parsed
    #[error("Invalid config file {path:?}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// Element id is not on the board
    #[error("Element '{id}' not found on board")]
    ElementNotFound { id: String },

    /// Operation needs a selected text element
    #[error("No text element selected")]
    NoTextSelected,

    /// Board is opened read-only
    #[error("Board is read-only")]
    ReadOnly,

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for hopeboard-core operations
pub type Result<T> = std::result::Result<T, HopeError>;

impl HopeError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an element-not-found error
    pub fn element_not_found(id: impl Into<String>) -> Self {
        Self::ElementNotFound { id: id.into() }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HopeError::element_not_found("abc");
        assert_eq!(err.to_string(), "Element 'abc' not found on board");

        let err = HopeError::invalid_config("/tmp/config.toml", "expected table");
        assert!(err.to_string().contains("Invalid config file"));
        assert!(err.to_string().contains("/tmp/config.toml"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: HopeError = io_err.into();

        assert!(matches!(err, HopeError::Io { .. }));
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: HopeError = ValidationError::Empty { field: "title" }.into();
        assert_eq!(err.to_string(), "title cannot be empty");
    }
}
