//! Form submissions
//!
//! Submissions are created below their form but addressed by id afterwards.
//! Attachments are uploaded through the space web application rather than
//! the REST API, then linked to a submission field by an update.

use super::Resource;
use crate::api::{ApiClient, fetch_all_pages};
use crate::error::{Error, ResponseExt, Result};
use kinetic_transport::{FilePart, KineticResponse, MultipartForm, RequestBody};
use serde_json::{Value, json};
use tracing::debug;

/// Multipart field the upload endpoint reads the file from
const UPLOAD_FIELD: &str = "package";

/// Submission operations.
#[derive(Debug, Clone)]
pub struct Submissions {
    api: ApiClient,
    web: ApiClient,
}

impl Submissions {
    pub(crate) fn new(api: ApiClient, web: ApiClient) -> Self {
        Self { api, web }
    }

    /// Create a submission on a form.
    ///
    /// Pass `completed=false` in `params` to leave it in draft.
    pub async fn create(
        &self,
        kapp: &str,
        form: &str,
        body: impl Into<RequestBody>,
        params: &[(&str, &str)],
    ) -> Result<KineticResponse> {
        self.api
            .post(&["kapps", kapp, "forms", form, "submissions"], body, params)
            .await
    }

    /// Fetch a submission by id.
    pub async fn find(&self, id: &str, params: &[(&str, &str)]) -> Result<KineticResponse> {
        self.api.get(&["submissions", id], params).await
    }

    /// Update a submission's values or core state.
    pub async fn update(
        &self,
        id: &str,
        body: impl Into<RequestBody>,
        params: &[(&str, &str)],
    ) -> Result<KineticResponse> {
        self.api.put(&["submissions", id], body, params).await
    }

    /// Delete a submission.
    pub async fn delete(&self, id: &str) -> Result<KineticResponse> {
        self.api.delete(&["submissions", id]).await
    }

    /// Fetch one page of a form's submissions.
    ///
    /// The response carries `nextPageToken` when more pages exist.
    pub async fn find_page(
        &self,
        kapp: &str,
        form: &str,
        params: &[(&str, &str)],
    ) -> Result<KineticResponse> {
        self.api
            .get(&["kapps", kapp, "forms", form, "submissions"], params)
            .await
    }

    /// Fetch every submission of a form, following page tokens.
    pub async fn find_all(
        &self,
        kapp: &str,
        form: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Value>> {
        fetch_all_pages(
            &self.api,
            &["kapps", kapp, "forms", form, "submissions"],
            params,
            "submissions",
        )
        .await
    }

    /// Fetch every submission in a kapp, following page tokens.
    pub async fn find_all_in_kapp(
        &self,
        kapp: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Value>> {
        fetch_all_pages(&self.api, &["kapps", kapp, "submissions"], params, "submissions").await
    }

    /// Upload a file for an attachment field of `form`.
    ///
    /// A successful response holds a JSON array of file descriptors to store
    /// in the field's value.
    pub async fn upload_attachment(
        &self,
        kapp: &str,
        form: &str,
        file: FilePart,
    ) -> Result<KineticResponse> {
        let upload = MultipartForm::new().file(UPLOAD_FIELD, file);
        self.web
            .post_multipart(&[kapp, form, "files"], upload, &[])
            .await
    }

    /// Upload a file and store it in `field` of an existing submission.
    ///
    /// Returns the failed upload response as-is when the upload is not 2xx;
    /// otherwise the response of the submission update.
    pub async fn add_attachment(
        &self,
        kapp: &str,
        form: &str,
        id: &str,
        field: &str,
        file: FilePart,
    ) -> Result<KineticResponse> {
        let uploaded = self.upload_attachment(kapp, form, file).await?;
        if !uploaded.is_success() {
            return Ok(uploaded);
        }

        let descriptors = match uploaded.into_json()? {
            Value::Array(files) => files,
            other => {
                return Err(Error::UnexpectedBody(format!(
                    "file upload returned {other} instead of an array"
                )));
            }
        };
        debug!(submission = id, field, files = descriptors.len(), "Linking uploaded attachment");

        let values = json!({ "values": { field: descriptors } });
        self.update(id, values, &[]).await
    }
}

impl Resource for Submissions {
    fn api(&self) -> &ApiClient {
        &self.api
    }
}
