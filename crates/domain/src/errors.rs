//! Error types used throughout the client

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Main error type for the SmartThings client
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum EndpointError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The authenticator does not implement the requested capability. This is
    /// not a failed attempt.
    #[error("Operation not supported by this authenticator: {operation}")]
    UnsupportedOperation { operation: String },

    #[error("Error {status} refreshing token, with message {body}")]
    AuthRefresh { status: u16, body: Value },

    #[error("Skipping request; dry run mode")]
    DryRun,

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: Value },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EndpointError {
    /// Shorthand for [`EndpointError::UnsupportedOperation`].
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation { operation: operation.into() }
    }

    /// Whether this error means "capability not implemented" rather than
    /// "attempt failed".
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    /// HTTP status carried by API and refresh failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::AuthRefresh { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EndpointError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, EndpointError>;
