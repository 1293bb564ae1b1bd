//! API resource endpoints
//!
//! Each wrapper maps a method to one verb and URL template and returns the
//! normalized [`KineticResponse`](kinetic_transport::KineticResponse), so
//! callers decide how to treat non-2xx answers.

pub mod collection;
pub mod space;
pub mod submissions;
pub mod task;

pub use collection::Collection;
pub use space::Space;
pub use submissions::Submissions;
pub use task::{Engine, Trees};

use crate::api::ApiClient;

/// Base trait for API resources.
pub trait Resource {
    /// The API root this resource is served from.
    fn api(&self) -> &ApiClient;
}
