//! Sync Error Types
//!
//! This module defines the failures the synchronization core can report.
//!
//! # Error Categories
//!
//! - `NetworkFailure` - Transport-level failure; polling retries on the next tick
//! - `AuthRequired` - No bearer token present; raised before any network call
//! - `ValidationError` - Local input rejected before any network call
//! - `ServerRejection` - Non-2xx response carrying the backend's detail message
//! - `SerializationError` - Response body could not be decoded
//!
//! # Usage
//!
//! ```rust
//! use marketsync::shared::error::SyncError;
//!
//! let error = SyncError::validation("content", "Message cannot be empty");
//! assert!(!error.is_transient());
//! ```
use thiserror::Error;

/// Errors produced by the remote client, the caches and the mutators
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    /// Transport-level failure (connection refused, reset, timeout)
    #[error("Network error: {message}")]
    NetworkFailure {
        /// Human-readable error message
        message: String,
    },

    /// No credential is present for an operation that needs one
    #[error("Authentication required")]
    AuthRequired,

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The server answered with a non-success status
    #[error("Request rejected ({status}): {detail}")]
    ServerRejection {
        /// HTTP status code
        status: u16,
        /// Detail message from the response body, verbatim
        detail: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },
}

impl SyncError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new server rejection
    pub fn rejected(status: u16, detail: impl Into<String>) -> Self {
        Self::ServerRejection {
            status,
            detail: detail.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Whether the next poll tick may succeed without user action
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkFailure { .. } | Self::SerializationError { .. }
        )
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::ServerRejection { detail, .. } => detail.clone(),
            Self::AuthRequired => "Please log in to continue".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::serialization(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Result alias used across the crate
pub type SyncResult<T> = Result<T, SyncError>;
