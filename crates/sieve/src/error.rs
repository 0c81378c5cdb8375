//! Error types for the Sieve library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sieve operations.
///
/// Fingerprinting never produces one of these; its faults are absorbed into
/// `SchemaFingerprint::issues`.
#[derive(Debug, Error)]
pub enum SieveError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A request or command field failed validation.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// File type is not one of json, csv, xml, yaml.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Missing or wrong administrative credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The reasoning provider failed to produce a response.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The reasoning provider did not answer in time.
    #[error("Provider timed out after {0} seconds")]
    ProviderTimeout(u64),

    /// The reasoning provider or the service is throttling requests.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited { retry_after: Option<u64> },

    /// Cache store failure.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SieveError {
    /// Shorthand for a validation error on a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SieveError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Sieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
