//! Redirect detection over raw HTTP responses.
//!
//! Two mechanisms are honored: a 302 response with a `Location` header, and
//! a 200 response carrying a meta-refresh-style `Refresh` header
//! (`<seconds>=<url>` or `<seconds>; url=<url>`). Exactly one mechanism is
//! consulted per status: a 302 never looks at `Refresh`, and a 200 never
//! looks at `Location`. Hop counting is the fetcher's responsibility.

use reqwest::header::{HeaderMap, LOCATION};

/// Non-standard header carrying meta-refresh-style redirects.
const REFRESH: &str = "refresh";

/// Outcome of inspecting one response for a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// The response is terminal; no redirect applies.
    None,
    /// HTTP 302 pointed at a new location.
    FollowLocation(String),
    /// HTTP 200 carried a `Refresh` header pointing at a new location.
    FollowRefresh(String),
}

/// Decides whether a response represents a redirect and where it points.
///
/// The returned target may be relative; callers join it against the URL the
/// response came from.
#[must_use]
pub fn resolve_redirect(status: u16, headers: &HeaderMap) -> RedirectDecision {
    match status {
        302 => match header_str(headers, LOCATION.as_str()) {
            Some(location) if !location.is_empty() => {
                RedirectDecision::FollowLocation(location.to_string())
            }
            _ => RedirectDecision::None,
        },
        200 => match header_str(headers, REFRESH).and_then(refresh_target) {
            Some(target) => RedirectDecision::FollowRefresh(target),
            None => RedirectDecision::None,
        },
        _ => RedirectDecision::None,
    }
}

/// Extracts the URL from a `Refresh` header value.
///
/// Splits on the first `=` and takes the trailing component, which handles
/// both `0=https://...` and `0; url=https://...` (query strings containing
/// `=` survive intact).
fn refresh_target(value: &str) -> Option<String> {
    let (_, target) = value.split_once('=')?;
    let target = target.trim();
    (!target.is_empty()).then(|| target.to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok().map(str::trim)
}
