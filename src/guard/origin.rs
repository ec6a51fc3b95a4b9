//! Redirect target construction against the request's own origin.

use std::str::FromStr;

use axum::http::uri::Authority;
use axum::http::{HeaderMap, Uri};
use url::Url;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Origin (scheme and authority) of an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    url: Url,
}

impl RequestOrigin {
    /// Work out where the request was sent.
    ///
    /// An absolute request URI wins. Otherwise the `Host` header is used with
    /// the scheme from `X-Forwarded-Proto`, falling back to `default_scheme`.
    pub fn from_parts(uri: &Uri, headers: &HeaderMap, default_scheme: &str) -> Option<Self> {
        if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
            return Self::build(scheme, authority.as_str());
        }

        let host = headers
            .get(axum::http::header::HOST)
            .and_then(|h| h.to_str().ok())?;
        let scheme = forwarded_proto(headers).unwrap_or(default_scheme);
        Self::build(scheme, host)
    }

    fn build(scheme: &str, host: &str) -> Option<Self> {
        // Reject anything that is not a bare host[:port].
        let authority = Authority::from_str(host.trim()).ok()?;
        if authority.as_str().contains('@') {
            return None;
        }
        let url = Url::parse(&format!("{scheme}://{authority}")).ok()?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return None;
        }
        Some(Self { url })
    }

    /// Absolute URL for `path` on this origin.
    pub fn join(&self, path: &str) -> Option<String> {
        self.url.join(path).ok().map(String::from)
    }
}

fn forwarded_proto(headers: &HeaderMap) -> Option<&'static str> {
    let value = headers.get(X_FORWARDED_PROTO)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();
    if first.eq_ignore_ascii_case("https") {
        Some("https")
    } else if first.eq_ignore_ascii_case("http") {
        Some("http")
    } else {
        None
    }
}

/// `Location` value for a redirect to `target` on the request's origin.
///
/// Without a usable origin the bare path is returned, which clients resolve
/// against the URL they requested.
pub fn redirect_location(uri: &Uri, headers: &HeaderMap, default_scheme: &str, target: &str) -> String {
    RequestOrigin::from_parts(uri, headers, default_scheme)
        .and_then(|origin| origin.join(target))
        .unwrap_or_else(|| target.to_string())
}
