//! HTTP transport implementation
//!
//! Provides the reqwest-backed [`HttpTransport`] and the redirect helpers its
//! request loop relies on.

pub mod client;
pub mod redirect;

pub use client::HttpTransport;
