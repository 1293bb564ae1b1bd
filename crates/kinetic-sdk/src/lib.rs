//! # Kinetic SDK
//!
//! Rust SDK for the Kinetic platform REST APIs:
//! - Request CE: space, kapps, forms, submissions, users, teams, webhooks
//! - Task: trees, runs, handlers, sources, engine
//! - Bridgehub: bridges and their access keys
//! - Filehub: filestores and their access keys
//!
//! Every resource call returns a [`KineticResponse`]. HTTP error statuses and
//! transport failures (status `0`) are ordinary responses for the caller to
//! inspect; `Err` is reserved for requests that could not be built and for
//! helpers that need a successful answer, such as paginated fetches.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kinetic_sdk::{ConnectionConfig, RequestCe};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConnectionConfig::from_yaml_file("kinetic.yaml")?;
//!     let ce = RequestCe::new(&config)?;
//!
//!     let response = ce
//!         .submissions()
//!         .create("services", "checklist", json!({"values": {"Name": "Foo"}}), &[])
//!         .await?;
//!
//!     if response.is_success() {
//!         println!("created {}", response.parsed_body().unwrap()["submission"]["id"]);
//!     } else {
//!         eprintln!("{}: {}", response.status_code(), response.raw_body());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Bridgehub, Filehub, RequestCe, Task};
pub use config::{ConnectionConfig, SdkOptions, SslVerifyMode};
pub use error::{Error, ResponseExt, Result};
pub use export::export_forms;
pub use import::{ImportFailure, ImportOptions, ImportReport, import_submissions};
pub use kinetic_transport::{
    FilePart, HttpRequest, KineticResponse, LogLevel, MultipartForm, RequestBody, Transport,
};

/// Re-exported so callers can implement [`Transport`] without a direct
/// dependency.
pub use async_trait::async_trait;

// Module declarations
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod observability;
pub mod resources;

/// `User-Agent` sent by the SDK clients
pub const USER_AGENT: &str = concat!("kinetic-sdk-rust/", env!("CARGO_PKG_VERSION"));
