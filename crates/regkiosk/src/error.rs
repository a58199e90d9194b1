//! Error types for regkiosk.
//!
//! This module defines all error types used throughout the regkiosk crate,
//! covering form validation, signature pad misuse, and gateway failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for regkiosk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A required form field is blank.
    #[error("required field '{field}' is empty")]
    MissingField {
        /// Name of the blank field.
        field: &'static str,
    },

    /// A form field holds a value outside its allowed set.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidFieldValue {
        /// Name of the field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The signature pad holds no ink.
    #[error("signature is required: the pad is empty")]
    EmptySignature,

    // === Duplicate Errors ===
    /// A record with the same registration key already exists.
    #[error("duplicate registration: '{key}' is already registered")]
    DuplicateKey {
        /// The registration key that collided.
        key: String,
    },

    // === Signature Pad Errors ===
    /// `begin_stroke` was called while a stroke is active.
    #[error("a stroke is already in progress")]
    StrokeInProgress,

    /// `extend_stroke` or `end_stroke` was called with no active stroke.
    #[error("no stroke in progress")]
    NoActiveStroke,

    // === Local Gateway Errors ===
    /// Failed to open or create the local database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The stored record document could not be parsed or written.
    #[error("record document error: {0}")]
    Document(#[from] serde_json::Error),

    // === Remote Gateway Errors ===
    /// The remote table rejected a request.
    #[error("remote table error ({status}): {message}")]
    Remote {
        /// HTTP status code returned by the remote table.
        status: u16,
        /// Human-readable message from the response body.
        message: String,
    },

    /// The HTTP request itself failed (connection, protocol).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for regkiosk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing-field validation error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid-value validation error.
    #[must_use]
    pub fn invalid_field_value(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field,
            value: value.into(),
        }
    }

    /// Create a duplicate-key error.
    #[must_use]
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create a remote table error from a status code and message.
    #[must_use]
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a duplicate registration.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Check if this error is a form or signature validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::InvalidFieldValue { .. } | Self::EmptySignature
        )
    }

    /// Check if this error came from a gateway rather than user input.
    #[must_use]
    pub fn is_gateway(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::Document(_)
                | Self::Remote { .. }
                | Self::Http(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = Error::missing_field("firstName");
        assert_eq!(err.to_string(), "required field 'firstName' is empty");
    }

    #[test]
    fn test_invalid_field_value_display() {
        let err = Error::invalid_field_value("department", "Warehouse");
        assert_eq!(
            err.to_string(),
            "invalid value 'Warehouse' for field 'department'"
        );
    }

    #[test]
    fn test_empty_signature_display() {
        let err = Error::EmptySignature;
        assert!(err.to_string().contains("pad is empty"));
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = Error::duplicate_key("ana--cruz");
        assert!(err.to_string().contains("ana--cruz"));
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn test_is_duplicate() {
        assert!(Error::duplicate_key("x").is_duplicate());
        assert!(!Error::EmptySignature.is_duplicate());
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::missing_field("lastName").is_validation());
        assert!(Error::invalid_field_value("department", "Warehouse").is_validation());
        assert!(Error::EmptySignature.is_validation());
        assert!(!Error::duplicate_key("x").is_validation());
    }

    #[test]
    fn test_is_gateway() {
        let err = Error::remote(401, "bad token");
        assert!(err.is_gateway());
        assert!(!Error::StrokeInProgress.is_gateway());
    }

    #[test]
    fn test_remote_error_display() {
        let err = Error::remote(503, "service unavailable");
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("service unavailable"));
    }

    #[test]
    fn test_pad_error_display() {
        assert_eq!(
            Error::StrokeInProgress.to_string(),
            "a stroke is already in progress"
        );
        assert_eq!(Error::NoActiveStroke.to_string(), "no stroke in progress");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Document(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "pad width must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("pad width"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
