//! Redirect handling
//!
//! The reqwest client is built with redirects disabled; [`HttpTransport`]
//! follows them itself with a decrementing budget so the limit is visible and
//! testable.
//!
//! [`HttpTransport`]: super::HttpTransport

use http::header::{AUTHORIZATION, COOKIE, LOCATION, PROXY_AUTHORIZATION};
use http::{HeaderMap, StatusCode};
use url::Url;

/// Message carried by responses whose redirect budget ran out
pub const TOO_MANY_REDIRECTS: &str = "Too many redirects";

/// Whether a status asks the client to repeat the request elsewhere.
///
/// 300 (Multiple Choices) and 304 (Not Modified) are not followed.
pub fn is_redirect_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolve the `Location` header against the URL that produced it.
///
/// Returns `None` when the header is missing, not valid UTF-8, or does not
/// resolve to an `http`/`https` URL; the response is then terminal.
pub fn resolve_location(current: &Url, headers: &HeaderMap) -> Option<Url> {
    let location = headers.get(LOCATION)?.to_str().ok()?.trim();
    if location.is_empty() {
        return None;
    }
    let next = current.join(location).ok()?;
    match next.scheme() {
        "http" | "https" => Some(next),
        _ => None,
    }
}

/// Drop credentials before following a redirect to another origin.
///
/// Scheme, host and port must all match for `Authorization`, `Cookie` and
/// `Proxy-Authorization` to be carried over.
pub fn strip_cross_origin_credentials(headers: &mut HeaderMap, from: &Url, to: &Url) {
    if from.origin() != to.origin() {
        headers.remove(AUTHORIZATION);
        headers.remove(COOKIE);
        headers.remove(PROXY_AUTHORIZATION);
    }
}

/// Remaining redirects for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectBudget {
    remaining: u32,
}

impl RedirectBudget {
    /// Start with `limit` redirects available
    pub fn new(limit: u32) -> Self {
        Self { remaining: limit }
    }

    /// Consume one redirect. Returns `false` once the budget is exhausted.
    pub fn take(&mut self) -> bool {
        match self.remaining.checked_sub(1) {
            Some(left) => {
                self.remaining = left;
                true
            }
            None => false,
        }
    }

    /// Redirects still available
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use rstest::rstest;

    #[rstest]
    #[case(301, true)]
    #[case(302, true)]
    #[case(303, true)]
    #[case(307, true)]
    #[case(308, true)]
    #[case(300, false)]
    #[case(304, false)]
    #[case(200, false)]
    #[case(404, false)]
    fn test_is_redirect_status(#[case] status: u16, #[case] expected: bool) {
        let status = StatusCode::from_u16(status).unwrap();
        assert_eq!(is_redirect_status(status), expected);
    }

    fn location(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_resolve_absolute_location() {
        let current = Url::parse("http://a.test/one").unwrap();
        let next = resolve_location(&current, &location("https://b.test/two?x=1")).unwrap();
        assert_eq!(next.as_str(), "https://b.test/two?x=1");
    }

    #[test]
    fn test_resolve_relative_location() {
        let current = Url::parse("http://a.test/api/v1/items?page=2").unwrap();
        let next = resolve_location(&current, &location("/api/v2/items")).unwrap();
        assert_eq!(next.as_str(), "http://a.test/api/v2/items");

        let next = resolve_location(&current, &location("other")).unwrap();
        assert_eq!(next.as_str(), "http://a.test/api/v1/other");
    }

    #[test]
    fn test_missing_or_unusable_location() {
        let current = Url::parse("http://a.test/").unwrap();
        assert!(resolve_location(&current, &HeaderMap::new()).is_none());
        assert!(resolve_location(&current, &location("")).is_none());
        assert!(resolve_location(&current, &location("mailto:someone@a.test")).is_none());
    }

    fn credentials() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWRtaW46c2VjcmV0"));
        headers.insert(COOKIE, HeaderValue::from_static("session=1"));
        headers.insert("x-request-id", HeaderValue::from_static("req-1"));
        headers
    }

    #[rstest]
    #[case("http://a.test/one", "http://a.test/two", true)]
    #[case("http://a.test/one", "http://a.test:80/two", true)]
    #[case("http://a.test/one", "http://b.test/one", false)]
    #[case("http://a.test/one", "http://a.test:8080/one", false)]
    #[case("http://a.test/one", "https://a.test/one", false)]
    fn test_credentials_only_follow_same_origin(
        #[case] from: &str,
        #[case] to: &str,
        #[case] kept: bool,
    ) {
        let mut headers = credentials();
        strip_cross_origin_credentials(
            &mut headers,
            &Url::parse(from).unwrap(),
            &Url::parse(to).unwrap(),
        );
        assert_eq!(headers.contains_key(AUTHORIZATION), kept);
        assert_eq!(headers.contains_key(COOKIE), kept);
        assert!(headers.contains_key("x-request-id"));
    }

    #[test]
    fn test_budget_counts_down() {
        let mut budget = RedirectBudget::new(2);
        assert!(budget.take());
        assert_eq!(budget.remaining(), 1);
        assert!(budget.take());
        assert_eq!(budget.remaining(), 0);
        assert!(!budget.take());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_zero_budget_follows_nothing() {
        let mut budget = RedirectBudget::new(0);
        assert!(!budget.take());
    }
}
