//! Transport configuration
//!
//! Passed to [`HttpTransport::with_config`](crate::HttpTransport::with_config)
//! once and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default number of redirects followed before giving up
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Verbosity of request logging.
///
/// Ordered so that `level >= LogLevel::Debug` reads naturally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No request logging
    #[default]
    Off,
    /// Redirects and transport failures
    Info,
    /// Request lines, headers and response statuses
    Debug,
    /// Everything above plus body sizes and response bodies
    Trace,
}

impl LogLevel {
    /// Lowercase name, as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "" => Ok(LogLevel::Off),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// How server certificates are checked on HTTPS connections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Verify against the built-in root store
    #[default]
    Verify,
    /// Verify, additionally trusting the PEM certificate(s) in this file
    VerifyWithCa(PathBuf),
    /// Accept any certificate. Only for test servers.
    AcceptInvalid,
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Redirect budget used when a request does not set its own
    pub max_redirects: u32,

    /// Certificate verification mode
    pub tls: TlsMode,

    /// Request logging verbosity
    pub log_level: LogLevel,

    /// Value of the `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: Duration::from_secs(30),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            tls: TlsMode::Verify,
            log_level: LogLevel::Off,
            user_agent: format!("kinetic-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
