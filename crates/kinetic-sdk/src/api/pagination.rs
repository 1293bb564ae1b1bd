//! `pageToken` / `nextPageToken` paging
//!
//! Request CE list endpoints return at most `limit` items per call along with
//! a `nextPageToken`; passing it back as `pageToken` yields the next page.
//! The last page has no token (or an empty one).

use super::ApiClient;
use crate::error::{Error, ResponseExt, Result};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Query parameter carrying the continuation token
pub const PAGE_TOKEN: &str = "pageToken";

/// Response key holding the next token
pub const NEXT_PAGE_TOKEN: &str = "nextPageToken";

/// Fetch every page of a list endpoint and concatenate the `items_key`
/// arrays, in server order.
///
/// Any caller-supplied `pageToken` is used for the first request only. A
/// non-2xx page fails the whole fetch with [`Error::Api`]; pages fetched
/// before it are discarded. Paging stops once the server hands back a token
/// that was already sent.
pub async fn fetch_all_pages<S: AsRef<str>>(
    api: &ApiClient,
    segments: &[S],
    params: &[(&str, &str)],
    items_key: &str,
) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    let mut token = params
        .iter()
        .find(|(key, _)| *key == PAGE_TOKEN)
        .map(|(_, value)| value.to_string());
    let mut seen: HashSet<String> = token.iter().cloned().collect();
    let mut pages = 0usize;

    loop {
        let mut page_params: Vec<(&str, &str)> = params
            .iter()
            .copied()
            .filter(|(key, _)| *key != PAGE_TOKEN)
            .collect();
        if let Some(token) = token.as_deref() {
            page_params.push((PAGE_TOKEN, token));
        }

        let body = api.get(segments, &page_params).await?.into_json()?;
        pages += 1;

        match body.get(items_key) {
            Some(Value::Array(page)) => items.extend(page.iter().cloned()),
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(Error::UnexpectedBody(format!(
                    "'{items_key}' is not an array: {other}"
                )));
            }
        }

        match body.get(NEXT_PAGE_TOKEN).and_then(Value::as_str) {
            Some(next) if !next.is_empty() && seen.insert(next.to_string()) => {
                token = Some(next.to_string());
            }
            Some(next) if !next.is_empty() => {
                debug!(token = next, "Page token repeated, stopping");
                break;
            }
            _ => break,
        }
    }

    debug!(pages, items = items.len(), key = items_key, "Fetched all pages");
    Ok(items)
}
