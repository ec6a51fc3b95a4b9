//! Cookie name extraction.

use std::collections::BTreeSet;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

/// Names of all cookies carried by the request, across every `Cookie` header.
///
/// Malformed pairs are skipped, so they count the same as absent cookies.
pub fn cookie_names(headers: &HeaderMap) -> BTreeSet<String> {
    CookieJar::from_headers(headers)
        .iter()
        .map(|cookie| cookie.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;

    #[test]
    fn test_no_cookie_header() {
        assert!(cookie_names(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn test_multiple_pairs_and_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("sb-access-token=x; theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("session_id=y"));

        let names = cookie_names(&headers);
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["sb-access-token", "session_id", "theme"]);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1; a=2"));
        assert_eq!(cookie_names(&headers).len(), 1);
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("garbage; =novalue; ok=1"));

        let names = cookie_names(&headers);
        assert!(names.contains("ok"));
        assert!(!names.contains("garbage"));
    }
}
