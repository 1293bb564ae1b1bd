//! Structured logging helpers
//!
//! The transport logs individual HTTP exchanges according to
//! [`LogLevel`]; this module covers SDK-level outcomes and, with the `trace`
//! feature, installing a `tracing-subscriber` formatter for binaries.

use kinetic_transport::{KineticResponse, LogLevel};
use tracing::{debug, warn};

/// Crates whose events the default filter enables
const SDK_TARGETS: [&str; 2] = ["kinetic_transport", "kinetic_sdk"];

/// `EnvFilter` directive enabling SDK events at `level`.
///
/// `LogLevel::Off` silences the SDK; other crates are left at `warn`.
pub fn filter_directive(level: LogLevel) -> String {
    let sdk_level = match level {
        LogLevel::Off => "off",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };
    let mut directive = String::from("warn");
    for target in SDK_TARGETS {
        directive.push_str(&format!(",{target}={sdk_level}"));
    }
    directive
}

/// Log the outcome of one SDK operation.
///
/// Successes go to `debug`, anything else to `warn` with the status and
/// message.
pub fn log_outcome(operation: &str, resource: &str, response: &KineticResponse) {
    if response.is_success() {
        debug!(
            operation,
            resource,
            status = response.status_code(),
            "Operation succeeded"
        );
    } else {
        warn!(
            operation,
            resource,
            status = response.status_code(),
            reason = %response.message(),
            body = %response.raw_body(),
            "Operation failed"
        );
    }
}

/// Install a global formatter honoring `RUST_LOG`, falling back to
/// [`filter_directive`] for `level`.
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "trace")]
pub fn init_tracing(level: LogLevel) -> crate::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| crate::Error::Config(format!("tracing subscriber: {e}")))
}
