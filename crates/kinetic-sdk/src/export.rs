//! Form definition export
//!
//! Writes every form of a kapp to `{directory}/{kapp}/forms/{slug}.json`,
//! pretty-printed, so definitions can be kept under version control.

use crate::client::RequestCe;
use crate::error::{Error, ResponseExt, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Properties requested for each exported form
pub const FORM_EXPORT_INCLUDES: &str =
    "details,fields,pages,attributes,categorizations,securityPolicies,bridgedResources,customHeadContent,indexDefinitions";

/// Export the form definitions of `kapp`.
///
/// `directory` defaults to the client's `export_directory` option. Returns
/// the written paths in listing order. Fails when the form listing is not
/// 2xx ([`Error::status`] then holds its status); forms whose slug cannot be
/// used as a file name are skipped with a warning.
pub async fn export_forms(
    client: &RequestCe,
    kapp: &str,
    directory: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let root = match directory {
        Some(directory) => directory.to_path_buf(),
        None => client
            .options()
            .export_directory
            .clone()
            .ok_or(Error::MissingConfig("export_directory"))?,
    };
    if !is_safe_file_stem(kapp) {
        return Err(Error::Config(format!("kapp slug '{kapp}' is not a valid directory name")));
    }

    let body = client
        .forms(kapp)
        .find_all(&[("include", FORM_EXPORT_INCLUDES)])
        .await?
        .into_json()
        .map_err(|e| e.context(format!("Failed to list forms of kapp '{kapp}'")))?;

    let forms = match body.get("forms") {
        Some(Value::Array(forms)) => forms,
        _ => return Err(Error::UnexpectedBody("form listing has no 'forms' array".into())),
    };

    let forms_dir = root.join(kapp).join("forms");
    tokio::fs::create_dir_all(&forms_dir).await?;

    let mut written = Vec::with_capacity(forms.len());
    for form in forms {
        let Some(slug) = form.get("slug").and_then(Value::as_str) else {
            warn!(kapp, "Skipping form without a slug");
            continue;
        };
        if !is_safe_file_stem(slug) {
            warn!(kapp, slug, "Skipping form whose slug is not a valid file name");
            continue;
        }

        let path = forms_dir.join(format!("{slug}.json"));
        let mut contents = serde_json::to_string_pretty(form)?;
        contents.push('\n');
        tokio::fs::write(&path, contents).await?;
        written.push(path);
    }

    info!(kapp, forms = written.len(), directory = %forms_dir.display(), "Exported forms");
    Ok(written)
}

fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
