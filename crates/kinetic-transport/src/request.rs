//! Outgoing request types
//!
//! An [`HttpRequest`] is plain data: verb, target URL, query parameters,
//! headers, an optional body and an optional redirect budget. It is consumed
//! by [`Transport::execute`](crate::Transport::execute) and not retained.

use crate::error::{Result, TransportError};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use url::Url;

/// HTTP verb of a request.
///
/// Multipart uploads are `Post` with a [`RequestBody::Multipart`] body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// DELETE
    Delete,
    /// GET
    Get,
    /// PATCH
    Patch,
    /// POST
    Post,
    /// PUT
    Put,
}

impl HttpMethod {
    /// Uppercase method name as it appears on the request line
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

/// Request payload.
///
/// `Text` goes on the wire unmodified, which lets callers pre-serialize
/// (pretty-printed JSON, XML, anything else). `Json` is serialized with
/// `serde_json::to_string` right before sending.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Sent exactly as given
    Text(String),
    /// Serialized to JSON text before sending
    Json(Value),
    /// Sent as `multipart/form-data`
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Build a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Serialization`] if the value cannot be
    /// represented as JSON (for example a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    /// The text that goes on the wire for non-multipart bodies.
    ///
    /// Returns `None` for multipart bodies, whose encoding belongs to the
    /// HTTP client.
    pub fn to_wire_string(&self) -> Result<Option<String>> {
        match self {
            RequestBody::Text(text) => Ok(Some(text.clone())),
            RequestBody::Json(value) => Ok(Some(serde_json::to_string(value)?)),
            RequestBody::Multipart(_) => Ok(None),
        }
    }

    /// Whether this body is a multipart form
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        RequestBody::Multipart(form)
    }
}

/// A file uploaded as one multipart part
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    file_name: String,
    bytes: Bytes,
    content_type: Option<String>,
}

impl FilePart {
    /// Create a file part from in-memory content
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Read a file from disk. The part is named after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Override the detected MIME type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// File name sent in the part's `Content-Disposition`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// File content
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Explicit MIME type if set, otherwise one guessed from the extension
    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or_else(|| guess_mime_type(&self.file_name))
    }
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartField {
    /// Plain text value
    Text(String),
    /// File upload
    File(FilePart),
}

/// Ordered multipart form fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    fields: Vec<(String, MultipartField)>,
}

impl MultipartForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .push((name.into(), MultipartField::Text(value.into())));
        self
    }

    /// Append a file field
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.fields.push((name.into(), MultipartField::File(file)));
        self
    }

    /// Append a file read from disk
    pub async fn file_from_path(self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let part = FilePart::from_path(path).await?;
        Ok(self.file(name, part))
    }

    /// Fields in insertion order
    pub fn fields(&self) -> &[(String, MultipartField)] {
        &self.fields
    }

    /// Whether the form has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build the reqwest form. reqwest forms are single-use, so this runs
    /// once per redirect hop.
    pub(crate) fn to_reqwest(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, field) in &self.fields {
            form = match field {
                MultipartField::Text(value) => form.text(name.clone(), value.clone()),
                MultipartField::File(file) => {
                    let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                        .file_name(file.file_name.clone())
                        .mime_str(file.content_type())
                        .map_err(|e| TransportError::Multipart {
                            field: name.clone(),
                            reason: e.to_string(),
                        })?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// Guess a MIME type from a file name's extension.
///
/// Falls back to `application/octet-stream`.
pub fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "json" => "application/json",
        "xml" => "application/xml",
        "csv" => "text/csv",
        "txt" | "log" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// One HTTP request: verb, target, headers and body
///
/// Represents an HTTP request to be sent via the [`Transport`](crate::Transport).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP verb
    pub method: HttpMethod,

    /// Absolute target URL
    pub url: Url,

    /// Query parameters appended to `url`
    pub query: Vec<(String, String)>,

    /// Request headers
    pub headers: HeaderMap,

    /// Request body (optional)
    pub body: Option<RequestBody>,

    /// Redirects to follow; `None` uses the transport's configured maximum
    pub redirect_budget: Option<u32>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] when `url` is not an absolute
    /// `http` or `https` URL.
    pub fn new(method: HttpMethod, url: &str) -> Result<Self> {
        Ok(Self {
            method,
            url: parse_url(url)?,
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            redirect_budget: None,
        })
    }

    /// Add a header, replacing any existing value for the same name
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::InvalidHeaderName(name.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| TransportError::InvalidHeaderValue(name.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Merge a header map, replacing existing values for the same names
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        for name in headers.keys() {
            self.headers.remove(name);
            for value in headers.get_all(name) {
                self.headers.append(name.clone(), value.clone());
            }
        }
        self
    }

    /// Append query parameters
    pub fn with_query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the number of redirects this request may follow
    pub fn with_redirect_budget(mut self, budget: u32) -> Self {
        self.redirect_budget = Some(budget);
        self
    }

    /// The URL including query parameters
    pub fn target_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        url
    }
}

/// Parse an absolute `http`/`https` URL
pub(crate) fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| TransportError::invalid_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TransportError::invalid_url(
            raw,
            format!("unsupported scheme '{other}'"),
        )),
    }
}
