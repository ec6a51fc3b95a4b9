//! Upstream forwarding.
//!
//! Requests the guard lets through are sent to the upstream application
//! with method, headers (including `Host` and `Cookie`) and body untouched.
//! Only the URI is rewritten to point at the upstream.

use std::str::FromStr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, InvalidUri, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::request_id;
use crate::observability::metrics;

/// Client for the upstream application.
#[derive(Clone)]
pub struct Upstream {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    timeout: Duration,
}

impl Upstream {
    /// Create a client for `address` (host:port).
    pub fn new(address: &str, timeout: Duration) -> Result<Self, InvalidUri> {
        let authority = Authority::from_str(address)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self {
            client,
            authority,
            timeout,
        })
    }

    /// Rewrite an inbound URI to target the upstream, keeping path and query.
    pub fn upstream_uri(&self, uri: &Uri) -> Result<Uri, axum::http::Error> {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// Fallback handler: forward everything that reached it to the upstream.
pub async fn forward_handler(State(upstream): State<Upstream>, req: Request<Body>) -> Response {
    let request_id = request_id(&req).to_string();
    let (mut parts, body) = req.into_parts();

    parts.uri = match upstream.upstream_uri(&parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        uri = %parts.uri,
        "Forwarding request"
    );

    let start = Instant::now();
    let result = tokio::time::timeout(
        upstream.timeout,
        upstream.client.request(Request::from_parts(parts, body)),
    )
    .await;
    metrics::record_upstream(start);

    match result {
        Ok(Ok(response)) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Ok(Err(e)) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %upstream.authority,
                error = %e,
                "Upstream error"
            );
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
        Err(_) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %upstream.authority,
                timeout = ?upstream.timeout,
                "Upstream timed out"
            );
            (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream() -> Upstream {
        Upstream::new("127.0.0.1:3000", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_uri_keeps_path_and_query() {
        let uri: Uri = "/admin/orders?page=2".parse().unwrap();
        assert_eq!(
            upstream().upstream_uri(&uri).unwrap(),
            "http://127.0.0.1:3000/admin/orders?page=2"
        );
    }

    #[tokio::test]
    async fn test_upstream_uri_replaces_absolute_authority() {
        let uri: Uri = "https://public.example.com/".parse().unwrap();
        assert_eq!(
            upstream().upstream_uri(&uri).unwrap(),
            "http://127.0.0.1:3000/"
        );
    }

    #[test]
    fn test_invalid_address() {
        assert!(Upstream::new("not a host", Duration::from_secs(1)).is_err());
    }
}
