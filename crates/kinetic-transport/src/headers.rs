//! Header construction helpers
//!
//! Pure functions building the header maps every API call sends: Basic
//! authentication, JSON content negotiation and the user agent.

use crate::error::{Result, TransportError};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Source of the `Authorization` header, consulted on every call
pub trait AuthProvider: Send + Sync + fmt::Debug {
    /// Full `Authorization` header value, or `None` to send no auth
    fn authorization(&self) -> Option<String>;
}

/// HTTP Basic credentials
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: SecretString,
}

impl BasicAuth {
    /// Create Basic credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into().into_boxed_str()),
        }
    }

    /// Create Basic credentials from an already-wrapped secret
    pub fn from_secret(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// The username
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AuthProvider for BasicAuth {
    fn authorization(&self) -> Option<String> {
        Some(basic_auth_value(
            &self.username,
            self.password.expose_secret(),
        ))
    }
}

/// Sends no `Authorization` header
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn authorization(&self) -> Option<String> {
        None
    }
}

/// `Basic base64(username:password)`
pub fn basic_auth_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// `Authorization` header for Basic credentials
pub fn header_basic_auth(username: &str, password: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        sensitive_value(&basic_auth_value(username, password))?,
    );
    Ok(headers)
}

/// `Accept: application/json`
pub fn header_accept_json() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// `Content-Type: application/json`
pub fn header_content_json() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// `User-Agent` header
pub fn header_user_agent(agent: &str) -> Result<HeaderMap> {
    let value = HeaderValue::from_str(agent)
        .map_err(|_| TransportError::InvalidHeaderValue(USER_AGENT.to_string()))?;
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, value);
    Ok(headers)
}

/// Auth, JSON `Accept`/`Content-Type` and `User-Agent` in one map
pub fn default_headers(auth: &dyn AuthProvider, user_agent: &str) -> Result<HeaderMap> {
    let mut headers = header_accept_json();
    headers.extend(header_content_json());
    headers.extend(header_user_agent(user_agent)?);
    if let Some(value) = auth.authorization() {
        headers.insert(AUTHORIZATION, sensitive_value(&value)?);
    }
    Ok(headers)
}

fn sensitive_value(value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|_| TransportError::InvalidHeaderValue(AUTHORIZATION.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Header pairs safe to log. Sensitive values are replaced.
pub(crate) fn redacted(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if value.is_sensitive() || *name == AUTHORIZATION {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.to_string(), shown)
        })
        .collect()
}
