//! Error types for grouplink
//!
//! Provides a unified error type for all operations.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using LinkError
pub type Result<T> = std::result::Result<T, LinkError>;

/// Unified error type for grouplink operations
#[derive(Debug, Error)]
pub enum LinkError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Submission Errors
    // -------------------------------------------------------------------------
    /// The transport refused the request before a future was produced
    #[error("Request submission failed: {0}")]
    Submission(String),

    /// The request was rejected locally before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The producer side of the future went away without a response
    #[error("connection closed before a response arrived")]
    Disconnected,

    #[error("error decoding response message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("request responded with {status}")]
    RequestRejected { status: i64 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LinkError {
    /// Status code carried by a rejected request, if any
    pub fn status(&self) -> Option<i64> {
        match self {
            LinkError::RequestRejected { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller may reasonably try the same request again.
    ///
    /// Only timeouts qualify; every other failure is either local or an
    /// explicit answer from the server.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LinkError::Timeout(_))
    }
}
