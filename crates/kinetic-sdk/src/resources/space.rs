//! The space itself

use super::Resource;
use crate::api::ApiClient;
use crate::error::Result;
use kinetic_transport::{KineticResponse, RequestBody};

/// Space properties and attributes (`/space`).
#[derive(Debug, Clone)]
pub struct Space {
    api: ApiClient,
}

impl Space {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the space, e.g. with `include=attributes,details`.
    pub async fn find(&self, params: &[(&str, &str)]) -> Result<KineticResponse> {
        self.api.get(&["space"], params).await
    }

    /// Update space properties.
    pub async fn update(&self, body: impl Into<RequestBody>) -> Result<KineticResponse> {
        self.api.put(&["space"], body, &[]).await
    }
}

impl Resource for Space {
    fn api(&self) -> &ApiClient {
        &self.api
    }
}
