//! Base URL + auth + transport, shared by every resource wrapper

use crate::config::append_segments;
use crate::error::{Error, Result};
use http::HeaderMap;
use kinetic_transport::headers::{AuthProvider, default_headers};
use kinetic_transport::{HttpMethod, HttpRequest, KineticResponse, MultipartForm, RequestBody, Transport};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// One REST API root.
///
/// Resource wrappers hand it path segments relative to the root; segments
/// are percent-encoded individually, so slugs and tree titles containing
/// `/`, spaces or `?` address the right resource.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthProvider>,
    base_url: Url,
    user_agent: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API rooted at `root` + `base_path`.
    pub fn new(
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
        root: &Url,
        base_path: &[&str],
    ) -> Result<Self> {
        let mut base_url = root.clone();
        base_url.set_query(None);
        base_url.set_fragment(None);
        append_segments(&mut base_url, base_path)?;
        Ok(Self {
            transport,
            auth,
            base_url,
            user_agent: crate::USER_AGENT.to_string(),
        })
    }

    /// Root of this API, e.g. `https://acme.example.com/app/api/v1`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of a resource below the root
    pub fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url> {
        let mut url = self.base_url.clone();
        append_segments(&mut url, segments)?;
        Ok(url)
    }

    /// Headers sent with every request: auth, JSON negotiation, user agent
    pub fn headers(&self) -> Result<HeaderMap> {
        Ok(default_headers(self.auth.as_ref(), &self.user_agent)?)
    }

    /// Issue one request against a resource below the root.
    pub async fn send<S: AsRef<str>>(
        &self,
        method: HttpMethod,
        segments: &[S],
        params: &[(&str, &str)],
        body: Option<RequestBody>,
    ) -> Result<KineticResponse> {
        let url = self.url(segments)?;
        let mut request = HttpRequest::new(method, url.as_str())?
            .with_headers(&self.headers()?)
            .with_query(params.iter().copied());
        if let Some(body) = body {
            request = request.with_body(body);
        }
        Ok(self.transport.execute(request).await?)
    }

    /// DELETE a resource
    pub async fn delete<S: AsRef<str>>(&self, segments: &[S]) -> Result<KineticResponse> {
        self.send(HttpMethod::Delete, segments, &[], None).await
    }

    /// GET a resource with query parameters
    pub async fn get<S: AsRef<str>>(
        &self,
        segments: &[S],
        params: &[(&str, &str)],
    ) -> Result<KineticResponse> {
        self.send(HttpMethod::Get, segments, params, None).await
    }

    /// PATCH a resource
    pub async fn patch<S: AsRef<str>>(
        &self,
        segments: &[S],
        body: impl Into<RequestBody>,
    ) -> Result<KineticResponse> {
        self.send(HttpMethod::Patch, segments, &[], Some(body.into()))
            .await
    }

    /// POST to a resource
    pub async fn post<S: AsRef<str>>(
        &self,
        segments: &[S],
        body: impl Into<RequestBody>,
        params: &[(&str, &str)],
    ) -> Result<KineticResponse> {
        self.send(HttpMethod::Post, segments, params, Some(body.into()))
            .await
    }

    /// POST a multipart form to a resource
    pub async fn post_multipart<S: AsRef<str>>(
        &self,
        segments: &[S],
        form: MultipartForm,
        params: &[(&str, &str)],
    ) -> Result<KineticResponse> {
        if form.is_empty() {
            return Err(Error::Config("multipart upload has no fields".into()));
        }
        self.send(HttpMethod::Post, segments, params, Some(form.into()))
            .await
    }

    /// PUT a resource
    pub async fn put<S: AsRef<str>>(
        &self,
        segments: &[S],
        body: impl Into<RequestBody>,
        params: &[(&str, &str)],
    ) -> Result<KineticResponse> {
        self.send(HttpMethod::Put, segments, params, Some(body.into()))
            .await
    }
}
