//! Task engine resources: trees and the engine itself

use super::Resource;
use crate::api::ApiClient;
use crate::error::Result;
use kinetic_transport::{FilePart, KineticResponse, MultipartForm, RequestBody};
use serde_json::json;

/// Workflow trees, addressed by their full title
/// (`{source} :: {group} :: {name}`).
#[derive(Debug, Clone)]
pub struct Trees {
    api: ApiClient,
}

impl Trees {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create a tree from a JSON definition.
    pub async fn add(&self, body: impl Into<RequestBody>) -> Result<KineticResponse> {
        self.api.post(&["trees"], body, &[]).await
    }

    /// Delete a tree.
    pub async fn delete(&self, title: &str) -> Result<KineticResponse> {
        self.api.delete(&["trees", title]).await
    }

    /// List trees, e.g. filtered with `source=...`.
    pub async fn find_all(&self, params: &[(&str, &str)]) -> Result<KineticResponse> {
        self.api.get(&["trees"], params).await
    }

    /// Fetch a tree.
    pub async fn find(&self, title: &str, params: &[(&str, &str)]) -> Result<KineticResponse> {
        self.api.get(&["trees", title], params).await
    }

    /// Update a tree's properties.
    pub async fn update(&self, title: &str, body: impl Into<RequestBody>) -> Result<KineticResponse> {
        self.api.put(&["trees", title], body, &[]).await
    }

    /// Import a tree from its XML export.
    ///
    /// With `force`, an existing tree of the same title is overwritten.
    pub async fn import(&self, source_xml: impl Into<String>, force: bool) -> Result<KineticResponse> {
        let file = FilePart::new("tree.xml", source_xml.into()).with_content_type("application/xml");
        let form = MultipartForm::new().file("content", file);
        let force = if force { "true" } else { "false" };
        self.api
            .post_multipart(&["trees"], form, &[("force", force)])
            .await
    }

    /// Export a tree as XML. The XML is the response's raw body.
    pub async fn export_xml(&self, title: &str) -> Result<KineticResponse> {
        self.api.get(&["trees", title, "export"], &[]).await
    }
}

impl Resource for Trees {
    fn api(&self) -> &ApiClient {
        &self.api
    }
}

/// The task engine process (`/engine`).
#[derive(Debug, Clone)]
pub struct Engine {
    api: ApiClient,
}

impl Engine {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Current engine state and thread counts.
    pub async fn status(&self) -> Result<KineticResponse> {
        self.api.get(&["engine"], &[]).await
    }

    /// Start the engine.
    pub async fn start(&self) -> Result<KineticResponse> {
        self.api
            .post(&["engine"], json!({ "action": "start" }), &[])
            .await
    }

    /// Stop the engine. Running nodes finish first.
    pub async fn stop(&self) -> Result<KineticResponse> {
        self.api
            .post(&["engine"], json!({ "action": "stop" }), &[])
            .await
    }
}

impl Resource for Engine {
    fn api(&self) -> &ApiClient {
        &self.api
    }
}
