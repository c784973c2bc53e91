//! Error types and result aliases for s3store operations.
//!
//! Provides a unified error type that covers every failure the backend can
//! surface to its caller. A read miss is never an error: `get` reports it as
//! `Ok(None)`.

use thiserror::Error;

/// Unified error type for all s3store operations
#[derive(Error, Debug)]
pub enum StoreError {
    // Staging errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize cache entry for '{key}': {message}")]
    Serialization { key: String, message: String },

    // Remote store errors
    #[error("Upload failure: {}", describe_status(*status, message))]
    Upload { status: Option<u16>, message: String },

    #[error("Delete failure: {}", describe_status(*status, message))]
    Delete { status: Option<u16>, message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Key codec errors
    #[error("Invalid key token '{token}': {reason}")]
    Codec { token: String, reason: String },

    // Config errors
    #[error("Failed to parse configuration: {message} at line {line}, column {column}")]
    ConfigParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Lifecycle hooks the backend does not implement
    #[error("Operation '{operation}' is not supported by the s3 store")]
    Unsupported { operation: &'static str },
}

/// Result type alias for s3store operations
pub type StoreResult<T> = Result<T, StoreError>;

fn describe_status(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("{} ({})", code, message),
        None => message.to_string(),
    }
}

impl StoreError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a validation error for a config field
    pub fn config(field: &str, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// HTTP status carried by an upload or delete failure, if the store answered
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Upload { status, .. } | StoreError::Delete { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if retrying the same call could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Network { .. } | StoreError::Io { .. } => true,
            StoreError::Upload { status, .. } | StoreError::Delete { status, .. } => {
                // transport failures and server-side errors
                status.map_or(true, |code| code >= 500 || code == 429)
            },
            _ => false,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::Io { .. } => {
                Some("Check that the staging directory exists, is writable and has free space")
            },
            StoreError::Upload {
                status: Some(401 | 403),
                ..
            }
            | StoreError::Delete {
                status: Some(401 | 403),
                ..
            } => Some("Check the object store credentials and bucket permissions"),
            StoreError::Upload { status: None, .. } | StoreError::Delete { status: None, .. } => {
                Some("Check the object store endpoint and your network connection")
            },
            StoreError::Network { .. } => Some("Check your internet connection and try again"),
            StoreError::ConfigParse { .. } | StoreError::ConfigValidation { .. } => {
                Some("Fix the s3store configuration file or the S3STORE_* environment variables")
            },
            StoreError::Unsupported { .. } => {
                Some("Expiry and bulk cleanup must be handled by the object store itself")
            },
            _ => None,
        }
    }
}
