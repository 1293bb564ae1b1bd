//! Normalized HTTP response
//!
//! [`KineticResponse`] is the single result shape of every transport call,
//! whatever the verb and whatever the outcome. HTTP error statuses are
//! ordinary responses; transport failures are responses with status `0` and a
//! [`FailureDetail`].

use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

/// Status code reported when no HTTP response was received
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Category of a failure recorded on a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The connection could not be established (refused, DNS, TLS)
    Connect,
    /// The request exceeded its timeout
    Timeout,
    /// The redirect budget ran out
    TooManyRedirects,
    /// Any other failure while sending the request
    Request,
    /// The response body could not be read
    Body,
    /// The server declared JSON but sent something else
    InvalidJson,
    /// The body was not valid UTF-8 and was decoded lossily
    InvalidUtf8,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Connect => "connect",
            FailureKind::Timeout => "timeout",
            FailureKind::TooManyRedirects => "too_many_redirects",
            FailureKind::Request => "request",
            FailureKind::Body => "body",
            FailureKind::InvalidJson => "invalid_json",
            FailureKind::InvalidUtf8 => "invalid_utf8",
        };
        f.write_str(name)
    }
}

/// Diagnostics for a failed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    kind: FailureKind,
    message: String,
    causes: Vec<String>,
}

impl FailureDetail {
    /// Create a failure detail without an underlying error
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Capture an error and its `source()` chain
    pub fn from_error(kind: FailureKind, error: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            kind,
            message: error.to_string(),
            causes,
        }
    }

    /// Classify a reqwest error
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FailureKind::Timeout
        } else if error.is_connect() {
            FailureKind::Connect
        } else if error.is_body() || error.is_decode() {
            FailureKind::Body
        } else {
            FailureKind::Request
        };
        Self::from_error(kind, error)
    }

    /// Failure category
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Top-level error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Messages of the underlying causes, outermost first
    pub fn causes(&self) -> &[String] {
        &self.causes
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        for cause in &self.causes {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

/// Outcome of one HTTP exchange.
///
/// Constructed once per request that ends a redirect chain and immutable
/// afterwards.
///
/// # Example
///
/// ```
/// use kinetic_transport::KineticResponse;
/// use http::{HeaderMap, HeaderValue, StatusCode};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("content-type", HeaderValue::from_static("application/json"));
///
/// let response = KineticResponse::from_parts(
///     StatusCode::NOT_FOUND,
///     headers,
///     r#"{"error":"not found"}"#.to_string(),
/// );
///
/// assert_eq!(response.status_code(), 404);
/// assert_eq!(response.message(), "Not Found");
/// assert_eq!(response.parsed_body().unwrap()["error"], "not found");
/// ```
#[derive(Debug, Clone)]
pub struct KineticResponse {
    status_code: u16,
    raw_body: String,
    parsed_body: Option<Value>,
    headers: HeaderMap,
    message: String,
    failure: Option<FailureDetail>,
}

impl KineticResponse {
    /// Normalize a received HTTP response.
    ///
    /// The body is parsed when the content-type declares JSON and the body is
    /// not blank. A body that fails to parse leaves `parsed_body` empty and
    /// records an [`FailureKind::InvalidJson`] failure; status, headers and raw
    /// body are kept as received.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, raw_body: String) -> Self {
        let message = status.canonical_reason().unwrap_or_default().to_string();

        let declares_json = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        let (parsed_body, failure) = if declares_json && !raw_body.trim().is_empty() {
            match serde_json::from_str::<Value>(&raw_body) {
                Ok(value) => (Some(value), None),
                Err(err) => (
                    None,
                    Some(FailureDetail::from_error(FailureKind::InvalidJson, &err)),
                ),
            }
        } else {
            (None, None)
        };

        Self {
            status_code: status.as_u16(),
            raw_body,
            parsed_body,
            headers,
            message,
            failure,
        }
    }

    /// Normalize a response from its undecoded body bytes.
    ///
    /// UTF-8 bodies go through [`from_parts`](Self::from_parts) unchanged. Any
    /// other body is kept as a lossy decoding, is never parsed, and records an
    /// [`FailureKind::InvalidUtf8`] failure.
    pub fn from_body_bytes(status: StatusCode, headers: HeaderMap, body: &[u8]) -> Self {
        match std::str::from_utf8(body) {
            Ok(text) => Self::from_parts(status, headers, text.to_string()),
            Err(err) => Self {
                status_code: status.as_u16(),
                raw_body: String::from_utf8_lossy(body).into_owned(),
                parsed_body: None,
                headers,
                message: status.canonical_reason().unwrap_or_default().to_string(),
                failure: Some(FailureDetail::from_error(FailureKind::InvalidUtf8, &err)),
            },
        }
    }

    /// Response for an exchange that produced no HTTP response
    pub fn transport_failure(detail: FailureDetail) -> Self {
        Self {
            status_code: NO_RESPONSE_STATUS,
            raw_body: String::new(),
            parsed_body: None,
            headers: HeaderMap::new(),
            message: detail.message().to_string(),
            failure: Some(detail),
        }
    }

    /// HTTP status code, or `0` for transport failures
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Response body exactly as received, when it is valid UTF-8
    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    /// JSON body, when the server declared and sent valid JSON
    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    /// Take ownership of the parsed JSON body
    pub fn into_parsed_body(self) -> Option<Value> {
        self.parsed_body
    }

    /// Response headers (case-insensitive lookup)
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header, if any
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Reason phrase, or the failure message for transport failures
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Failure diagnostics, present for transport failures and invalid JSON
    pub fn failure(&self) -> Option<&FailureDetail> {
        self.failure.as_ref()
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Check if response is a redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Check if response is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Check if response is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Check if no HTTP response was received
    pub fn is_transport_failure(&self) -> bool {
        self.status_code == NO_RESPONSE_STATUS
    }

    /// Deserialize the body into a typed value.
    ///
    /// Uses the parsed body when present, otherwise attempts the raw body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.parsed_body {
            Some(value) => T::deserialize(value),
            None => serde_json::from_str(&self.raw_body),
        }
    }
}

/// Whether a `Content-Type` value declares JSON.
///
/// Matches `application/json` and any `+json` suffix type, ignoring case and
/// parameters such as `charset`.
pub fn is_json_content_type(value: &str) -> bool {
    let media_type = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}
