//! Concurrent bulk submission import
//!
//! Submissions are created through a bounded set of tokio tasks. Each result
//! is tallied into a shared [`ImportReport`] as it completes; completion
//! order is not submission order. A failed submission is recorded and the
//! rest continue. Nothing is rolled back.

use crate::client::RequestCe;
use crate::error::{Error, Result};
use crate::observability::log_outcome;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::info;

/// Default number of submissions in flight
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Import tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Maximum requests in flight (values below 1 are treated as 1)
    pub concurrency: usize,
    /// Create submissions as completed rather than draft
    pub complete: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            complete: true,
        }
    }
}

/// One submission that could not be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    /// Position in the input
    pub index: usize,
    /// HTTP status, 0 when no response was received
    pub status: u16,
    /// Server or transport message
    pub message: String,
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Submissions created
    pub succeeded: usize,
    /// Submissions that failed, ordered by input position
    pub failed: Vec<ImportFailure>,
}

impl ImportReport {
    /// Number of submissions attempted
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }

    /// Whether every submission was created
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, index: usize, outcome: Result<kinetic_transport::KineticResponse>) {
        match outcome {
            Ok(response) if response.is_success() => self.succeeded += 1,
            Ok(response) => {
                let message = match Error::from_response(&response) {
                    Error::Api { message, .. } => message,
                    other => other.to_string(),
                };
                self.failed.push(ImportFailure {
                    index,
                    status: response.status_code(),
                    message,
                });
            }
            Err(err) => self.failed.push(ImportFailure {
                index,
                status: 0,
                message: err.to_string(),
            }),
        }
    }
}

/// Create `submissions` on `kapp`/`form`, at most `options.concurrency` at a
/// time.
///
/// Each element is the request body for one submission, typically
/// `{"values": {...}}`. Remote and transport failures are reported in the
/// [`ImportReport`]; `Err` is returned only if a worker task panicked.
pub async fn import_submissions(
    client: &RequestCe,
    kapp: &str,
    form: &str,
    submissions: Vec<Value>,
    options: ImportOptions,
) -> Result<ImportReport> {
    let total = submissions.len();
    let permits = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let report = Arc::new(Mutex::new(ImportReport::default()));
    let completed = if options.complete { "true" } else { "false" };
    let mut workers = JoinSet::new();

    info!(kapp, form, total, concurrency = options.concurrency.max(1), "Importing submissions");

    for (index, body) in submissions.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        let report = Arc::clone(&report);
        let submissions = client.submissions();
        let kapp = kapp.to_string();
        let form = form.to_string();

        workers.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let outcome = submissions
                .create(&kapp, &form, body, &[("completed", completed)])
                .await;
            if let Ok(response) = &outcome {
                log_outcome("import submission", &format!("{kapp}/{form}#{index}"), response);
            }
            report.lock().await.record(index, outcome);
        });
    }

    while let Some(joined) = workers.join_next().await {
        joined.map_err(|e| Error::Other(anyhow::anyhow!("import worker failed: {e}")))?;
    }

    let mut report = std::mem::take(&mut *report.lock().await);
    report.failed.sort_by_key(|failure| failure.index);

    info!(
        kapp,
        form,
        succeeded = report.succeeded,
        failed = report.failed.len(),
        "Submission import finished"
    );
    Ok(report)
}
