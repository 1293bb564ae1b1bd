//! Low-level access to a Kinetic REST API root
//!
//! [`ApiClient`] turns path segments into absolute URLs and routes requests
//! through the shared [`Transport`](kinetic_transport::Transport). Resource
//! wrappers in [`crate::resources`] are thin layers on top of it.

pub mod client;
pub mod pagination;

pub use client::ApiClient;
pub use pagination::fetch_all_pages;
