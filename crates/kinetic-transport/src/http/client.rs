//! HTTP transport client implementation
//!
//! Implements the Transport trait for HTTP requests with manual redirect
//! following and response normalization.

use super::redirect::{
    RedirectBudget, TOO_MANY_REDIRECTS, is_redirect_status, resolve_location,
    strip_cross_origin_credentials,
};
use crate::config::{LogLevel, TlsMode, TransportConfig};
use crate::error::{Result, TransportError};
use crate::headers::redacted;
use crate::request::{HttpMethod, HttpRequest, MultipartForm, RequestBody};
use crate::response::{FailureDetail, FailureKind, KineticResponse};
use crate::traits::Transport;
use async_trait::async_trait;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use url::Url;

/// HTTP transport implementation
///
/// Handles HTTP requests with:
/// - One entry point per verb, all returning a [`KineticResponse`]
/// - Redirect following up to a per-request budget
/// - JSON serialization of structured bodies
/// - Multipart uploads with a derived `Content-Type`
/// - Conversion of transport failures into status-0 responses
///
/// Holds no mutable state; clones share the underlying connection setup.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
    config: Arc<TransportConfig>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Wire form of a request body, prepared once per request
enum Payload {
    Text(String),
    Multipart(MultipartForm),
}

impl Payload {
    fn prepare(body: Option<RequestBody>) -> Result<Option<Self>> {
        let Some(body) = body else {
            return Ok(None);
        };
        match body {
            RequestBody::Multipart(form) => Ok(Some(Payload::Multipart(form))),
            other => Ok(other.to_wire_string()?.map(Payload::Text)),
        }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a new HTTP transport with custom configuration
    ///
    /// # Errors
    ///
    /// Fails when the CA bundle named by [`TlsMode::VerifyWithCa`] cannot be
    /// read or parsed, or the reqwest client cannot be built.
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.clone());

        match &config.tls {
            TlsMode::Verify => {}
            TlsMode::VerifyWithCa(path) => {
                let pem = std::fs::read(path)?;
                let certificate = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| TransportError::Client(e.to_string()))?;
                builder = builder.add_root_certificate(certificate);
            }
            TlsMode::AcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
        })
    }

    /// The configuration this transport was built with
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Send a DELETE request
    pub async fn delete(&self, url: &str, headers: &HeaderMap) -> Result<KineticResponse> {
        let request = HttpRequest::new(HttpMethod::Delete, url)?.with_headers(headers);
        self.execute(request).await
    }

    /// Send a GET request with query parameters
    pub async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        headers: &HeaderMap,
    ) -> Result<KineticResponse> {
        let request = HttpRequest::new(HttpMethod::Get, url)?
            .with_query(params.iter().copied())
            .with_headers(headers);
        self.execute(request).await
    }

    /// Send a PATCH request
    pub async fn patch(
        &self,
        url: &str,
        body: impl Into<RequestBody>,
        headers: &HeaderMap,
    ) -> Result<KineticResponse> {
        let request = HttpRequest::new(HttpMethod::Patch, url)?
            .with_headers(headers)
            .with_body(body);
        self.execute(request).await
    }

    /// Send a POST request
    pub async fn post(
        &self,
        url: &str,
        body: impl Into<RequestBody>,
        headers: &HeaderMap,
    ) -> Result<KineticResponse> {
        let request = HttpRequest::new(HttpMethod::Post, url)?
            .with_headers(headers)
            .with_body(body);
        self.execute(request).await
    }

    /// Send a multipart POST request.
    ///
    /// Any `Content-Type` in `headers` is replaced by the multipart boundary
    /// type.
    pub async fn post_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        headers: &HeaderMap,
    ) -> Result<KineticResponse> {
        let request = HttpRequest::new(HttpMethod::Post, url)?
            .with_headers(headers)
            .with_body(form);
        self.execute(request).await
    }

    /// Send a PUT request
    pub async fn put(
        &self,
        url: &str,
        body: impl Into<RequestBody>,
        headers: &HeaderMap,
    ) -> Result<KineticResponse> {
        let request = HttpRequest::new(HttpMethod::Put, url)?
            .with_headers(headers)
            .with_body(body);
        self.execute(request).await
    }

    /// Execute a request, following redirects, and normalize the outcome.
    ///
    /// Each hop repeats the verb, body and headers, except that credentials
    /// are dropped once the redirect leaves the original origin.
    pub async fn execute(&self, request: HttpRequest) -> Result<KineticResponse> {
        let mut current = request.target_url();
        let HttpRequest {
            method,
            mut headers,
            body,
            redirect_budget,
            ..
        } = request;

        let payload = Payload::prepare(body)?;
        if matches!(payload, Some(Payload::Multipart(_))) {
            headers.remove(CONTENT_TYPE);
        }

        let mut budget = RedirectBudget::new(redirect_budget.unwrap_or(self.config.max_redirects));

        loop {
            let mut builder = self
                .client
                .request(method.into(), current.clone())
                .headers(headers.clone());
            builder = match &payload {
                None => builder,
                Some(Payload::Text(text)) => builder.body(text.clone()),
                Some(Payload::Multipart(form)) => builder.multipart(form.to_reqwest()?),
            };

            self.log_request(method, &current, &headers, payload.as_ref());

            let response = match builder.send().await {
                Ok(response) => response,
                Err(err) => {
                    return Ok(self.failed(method, &current, FailureDetail::from_reqwest(&err)));
                }
            };

            let status = response.status();
            if is_redirect_status(status)
                && let Some(next) = resolve_location(&current, response.headers())
            {
                if !budget.take() {
                    let detail = FailureDetail::new(
                        FailureKind::TooManyRedirects,
                        TOO_MANY_REDIRECTS,
                    );
                    return Ok(self.failed(method, &current, detail));
                }
                if self.config.log_level >= LogLevel::Info {
                    info!(
                        method = %method,
                        from = %current,
                        to = %next,
                        status = status.as_u16(),
                        remaining = budget.remaining(),
                        "Following redirect"
                    );
                }
                strip_cross_origin_credentials(&mut headers, &current, &next);
                current = next;
                continue;
            }

            let response_headers = response.headers().clone();
            return match response.bytes().await {
                Ok(body) => {
                    let normalized =
                        KineticResponse::from_body_bytes(status, response_headers, &body);
                    self.log_response(method, &current, &normalized);
                    Ok(normalized)
                }
                Err(err) => Ok(self.failed(method, &current, FailureDetail::from_reqwest(&err))),
            };
        }
    }

    fn failed(&self, method: HttpMethod, url: &Url, detail: FailureDetail) -> KineticResponse {
        if self.config.log_level >= LogLevel::Info {
            warn!(
                method = %method,
                url = %url,
                kind = %detail.kind(),
                error = %detail,
                "HTTP request failed"
            );
        }
        KineticResponse::transport_failure(detail)
    }

    fn log_request(
        &self,
        method: HttpMethod,
        url: &Url,
        headers: &HeaderMap,
        payload: Option<&Payload>,
    ) {
        if self.config.log_level < LogLevel::Debug {
            return;
        }
        debug!(
            method = %method,
            url = %url,
            headers = ?redacted(headers),
            "Sending HTTP request"
        );
        if self.config.log_level >= LogLevel::Trace {
            match payload {
                Some(Payload::Text(text)) => trace!(body_size = text.len(), "Request body"),
                Some(Payload::Multipart(form)) => {
                    trace!(fields = form.fields().len(), "Multipart request body")
                }
                None => {}
            }
        }
    }

    fn log_response(&self, method: HttpMethod, url: &Url, response: &KineticResponse) {
        if self.config.log_level < LogLevel::Debug {
            return;
        }
        debug!(
            method = %method,
            url = %url,
            status = response.status_code(),
            body_size = response.raw_body().len(),
            "Received HTTP response"
        );
        if self.config.log_level >= LogLevel::Trace {
            trace!(body = %response.raw_body(), "Response body");
        }
        if let Some(failure) = response.failure() {
            warn!(url = %url, error = %failure, "Response body could not be decoded");
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<KineticResponse> {
        HttpTransport::execute(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_http_transport_creation() {
        let transport = HttpTransport::new().expect("Failed to create transport");
        assert_eq!(transport.config().max_redirects, 5);
    }

    #[test]
    fn test_http_transport_with_config() {
        let config = TransportConfig {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 2,
            tls: TlsMode::AcceptInvalid,
            log_level: LogLevel::Debug,
            user_agent: "test-agent".to_string(),
        };

        let transport = HttpTransport::with_config(config).expect("Failed to create transport");
        assert_eq!(transport.config().timeout, Duration::from_secs(30));
        assert_eq!(transport.config().max_redirects, 2);
    }

    #[test]
    fn test_missing_ca_bundle_is_an_error() {
        let config = TransportConfig {
            tls: TlsMode::VerifyWithCa("/nonexistent/ca.pem".into()),
            ..Default::default()
        };
        let err = HttpTransport::with_config(config).unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_is_construction_error() {
        let transport = HttpTransport::new().unwrap();
        let err = transport
            .get("::not-a-url::", &[], &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }

    #[test]
    fn test_payload_prepare() {
        let payload = Payload::prepare(Some(RequestBody::from(serde_json::json!({"a": 1}))))
            .unwrap()
            .unwrap();
        assert!(matches!(payload, Payload::Text(ref text) if text == r#"{"a":1}"#));

        assert!(Payload::prepare(None).unwrap().is_none());
    }
}
