//! HTTP transport and response normalization for the Kinetic SDK
//!
//! Every call through this crate produces exactly one [`KineticResponse`]:
//! successful exchanges, HTTP error statuses, and transport failures alike.
//! Only construction errors (an unparseable URL, an invalid header) surface
//! as `Err`, because no request could be attempted.
//!
//! # Architecture
//!
//! - **Transport trait**: the seam SDK clients call through
//! - **HTTP transport**: reqwest client with an explicit redirect loop
//! - **Request/response types**: verb, URL, headers and body in; normalized response out
//! - **Header helpers**: Basic auth, JSON content negotiation, user agent
//!
//! # Usage
//!
//! ```no_run
//! use kinetic_transport::{HttpTransport, headers};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new()?;
//! let auth = headers::BasicAuth::new("admin", "secret");
//! let headers = headers::default_headers(&auth, "my-tool/1.0")?;
//!
//! let response = transport
//!     .post("https://example.test/api/v1/widgets", json!({"name": "Foo"}), &headers)
//!     .await?;
//!
//! if response.is_transport_failure() {
//!     eprintln!("could not reach server: {}", response.message());
//! } else {
//!     println!("{} {:?}", response.status_code(), response.parsed_body());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod request;
pub mod response;
pub mod traits;

// Re-export commonly used types
pub use config::{LogLevel, TlsMode, TransportConfig};
pub use error::{Result, TransportError};
pub use crate::http::HttpTransport;
pub use request::{FilePart, HttpMethod, HttpRequest, MultipartField, MultipartForm, RequestBody};
pub use response::{FailureDetail, FailureKind, KineticResponse};
pub use traits::Transport;
