//! Transport error types
//!
//! These are construction errors: the request could not be built, so nothing
//! was sent. Failures after a request leaves the process are reported inside
//! a [`KineticResponse`](crate::KineticResponse) instead.

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors raised before a request reaches the network
#[derive(Debug, Error)]
pub enum TransportError {
    /// The target URL could not be parsed or uses an unsupported scheme
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as supplied by the caller
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A header name contains characters not allowed by HTTP
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// A header value contains characters not allowed by HTTP
    #[error("Invalid HTTP header value for '{0}'")]
    InvalidHeaderValue(String),

    /// A request body could not be serialized to JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A multipart field could not be built
    #[error("Invalid multipart field '{field}': {reason}")]
    Multipart {
        /// Form field name
        field: String,
        /// Why the field was rejected
        reason: String,
    },

    /// I/O error while reading an upload or a CA bundle
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying HTTP client could not be configured
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl TransportError {
    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
