//! CRUD over a REST collection
//!
//! Most Kinetic resources follow the same shape: `POST {collection}` creates,
//! `GET {collection}` lists, and `GET|PUT|DELETE {collection}/{id}` address a
//! single member. Kapps, forms, users, teams, webhooks, bridges, filestores
//! and their access keys are all served by [`Collection`].

use super::Resource;
use crate::api::ApiClient;
use crate::error::Result;
use kinetic_transport::{KineticResponse, RequestBody};

/// A REST collection below an API root.
#[derive(Debug, Clone)]
pub struct Collection {
    api: ApiClient,
    path: Vec<String>,
}

impl Collection {
    /// Create a collection rooted at `path` (unencoded segments).
    pub(crate) fn new<I, S>(api: ApiClient, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            api,
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Path segments of the collection, relative to the API root
    pub fn path(&self) -> &[String] {
        &self.path
    }

    fn member<'a>(&'a self, id: &'a str) -> Vec<&'a str> {
        self.path
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(id))
            .collect()
    }

    /// Create a member.
    pub async fn add(&self, body: impl Into<RequestBody>) -> Result<KineticResponse> {
        self.api.post(&self.path, body, &[]).await
    }

    /// Delete a member.
    pub async fn delete(&self, id: &str) -> Result<KineticResponse> {
        self.api.delete(&self.member(id)).await
    }

    /// List members.
    pub async fn find_all(&self, params: &[(&str, &str)]) -> Result<KineticResponse> {
        self.api.get(&self.path, params).await
    }

    /// Fetch one member.
    pub async fn find(&self, id: &str, params: &[(&str, &str)]) -> Result<KineticResponse> {
        self.api.get(&self.member(id), params).await
    }

    /// Replace or partially update a member.
    ///
    /// Kinetic's `PUT` merges the supplied properties into the existing
    /// resource.
    pub async fn update(&self, id: &str, body: impl Into<RequestBody>) -> Result<KineticResponse> {
        self.api.put(&self.member(id), body, &[]).await
    }
}

impl Resource for Collection {
    fn api(&self) -> &ApiClient {
        &self.api
    }
}
