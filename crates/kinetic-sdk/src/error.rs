//! Error types for the Kinetic SDK
//!
//! Remote errors are ordinary [`KineticResponse`] values; this type covers
//! what cannot be expressed as a response: bad configuration, construction
//! errors from the transport, and helpers that require a 2xx answer.

use kinetic_transport::{KineticResponse, TransportError};
use serde_json::Value;
use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Kinetic SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be constructed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A helper that needs a successful answer received something else.
    ///
    /// `status` is 0 when no HTTP response was received.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body or reason phrase
        message: String,
    },

    /// A successful response did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    UnexpectedBody(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A required configuration value was not provided.
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Configuration file could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// Context description
        context: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Build an [`Error::Api`] from a response that was not successful.
    ///
    /// Kinetic services report failures as `{"error": "..."}` or
    /// `{"message": "..."}`; either is preferred over the reason phrase.
    pub fn from_response(response: &KineticResponse) -> Self {
        let from_body = response.parsed_body().and_then(|body| {
            ["error", "message", "errorMessage"]
                .iter()
                .find_map(|key| body.get(*key).and_then(Value::as_str))
        });

        let message = match from_body {
            Some(message) => message.to_string(),
            None if !response.raw_body().trim().is_empty() && response.parsed_body().is_none() => {
                response.raw_body().trim().to_string()
            }
            None => response.message().to_string(),
        };

        Error::Api {
            status: response.status_code(),
            message,
        }
    }

    /// HTTP status carried by an [`Error::Api`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::WithContext { source, .. } => {
                source.downcast_ref::<Error>().and_then(Error::status)
            }
            _ => None,
        }
    }

    /// Add context to an error.
    pub fn context<C>(self, context: C) -> Self
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        Error::WithContext {
            context: context.to_string(),
            source: Box::new(self),
        }
    }
}

/// Conversions from a normalized response into SDK results
pub trait ResponseExt: Sized {
    /// `Ok(self)` for 2xx responses, [`Error::Api`] otherwise.
    fn into_result(self) -> Result<Self>;

    /// The parsed JSON body of a 2xx response.
    ///
    /// Fails with [`Error::Api`] for other statuses and with
    /// [`Error::UnexpectedBody`] when the body was not JSON.
    fn into_json(self) -> Result<Value>;
}

impl ResponseExt for KineticResponse {
    fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::from_response(&self))
        }
    }

    fn into_json(self) -> Result<Value> {
        let response = self.into_result()?;
        if let Some(failure) = response.failure() {
            return Err(Error::UnexpectedBody(failure.to_string()));
        }
        let content_type = response.content_type().unwrap_or("none").to_string();
        response
            .into_parsed_body()
            .ok_or_else(|| Error::UnexpectedBody(format!("expected JSON, got content type {content_type}")))
    }
}
