//! Transport trait
//!
//! SDK clients talk to the network only through [`Transport`], so tests can
//! substitute a recording or canned implementation.

use crate::error::Result;
use crate::request::HttpRequest;
use crate::response::KineticResponse;
use async_trait::async_trait;

/// Executes one logical request and normalizes its outcome.
///
/// Implementations must return `Ok` for every request that was attempted,
/// including HTTP error statuses and transport failures. `Err` is reserved
/// for requests that could not be built.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request, following redirects, and normalize the result
    async fn execute(&self, request: HttpRequest) -> Result<KineticResponse>;
}
