//! Route guard middleware.
//! Redirects admin requests without an identity-provider session cookie.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::GateConfig;
use crate::guard::cookies::cookie_names;
use crate::guard::origin::redirect_location;
use crate::guard::policy::{Decision, GuardPolicy};
use crate::observability::metrics;
use crate::routing::{GuardMatcher, PatternError};

/// Everything the middleware needs, compiled from one config snapshot.
#[derive(Debug, Clone)]
pub struct GuardState {
    pub matcher: GuardMatcher,
    pub policy: GuardPolicy,
    pub default_scheme: String,
    pub redirect_status: StatusCode,
}

impl GuardState {
    pub fn from_config(config: &GateConfig) -> Result<Self, PatternError> {
        let redirect_status = StatusCode::from_u16(config.guard.redirect_status)
            .ok()
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::TEMPORARY_REDIRECT);

        Ok(Self {
            matcher: GuardMatcher::from_patterns(&config.guard.matcher)?,
            policy: GuardPolicy::from_config(&config.guard),
            default_scheme: config.listener.default_scheme.clone(),
            redirect_status,
        })
    }

    /// Decision for a request, including the matcher bypass.
    pub fn evaluate<B>(&self, req: &Request<B>) -> Option<Decision> {
        let path = req.uri().path();
        if !self.matcher.matches(path) {
            return None;
        }
        let names = cookie_names(req.headers());
        Some(self.policy.decide(path, names.iter().map(String::as_str)))
    }
}

/// Guard state shared with the middleware; swapped wholesale on reload.
pub type SharedGuard = Arc<ArcSwap<GuardState>>;

pub fn shared_guard(state: GuardState) -> SharedGuard {
    Arc::new(ArcSwap::from_pointee(state))
}

pub async fn route_guard_middleware(
    State(guard): State<SharedGuard>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let state = guard.load_full();

    let decision = match state.evaluate(&req) {
        Some(decision) => decision,
        None => {
            metrics::record_decision("bypass");
            return next.run(req).await;
        }
    };
    metrics::record_decision(decision.label());

    match decision {
        Decision::Forward => next.run(req).await,
        Decision::Redirect { target } => {
            let location =
                redirect_location(req.uri(), req.headers(), &state.default_scheme, &target);
            tracing::debug!(
                path = %req.uri().path(),
                location = %location,
                "No session cookie, redirecting to login"
            );
            (state.redirect_status, [(header::LOCATION, location)]).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    fn app(config: &GateConfig) -> Router {
        let guard = shared_guard(GuardState::from_config(config).unwrap());
        Router::new()
            .fallback(|| async { "page" })
            .layer(middleware::from_fn_with_state(guard, route_guard_middleware))
    }

    fn request(path: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path).header("host", "example.com");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_scenarios() {
        let app = app(&GateConfig::default());
        let cases = [
            ("/", None, None),
            ("/admin/login", None, None),
            ("/admin/dashboard", None, Some("http://example.com/admin/login")),
            ("/admin/dashboard", Some("sb-access-token=x"), None),
            ("/admin/settings", Some("session_id=y"), Some("http://example.com/admin/login")),
        ];

        for (path, cookie, redirect) in cases {
            let res = app.clone().oneshot(request(path, cookie)).await.unwrap();
            match redirect {
                None => assert_eq!(res.status(), StatusCode::OK, "{path} {cookie:?}"),
                Some(location) => {
                    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{path} {cookie:?}");
                    assert_eq!(res.headers()[header::LOCATION], location);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_unmatched_paths_bypass_guard() {
        let mut config = GateConfig::default();
        config.guard.matcher = vec!["/admin/:path+".into()];
        let app = app(&config);

        // `/admin` itself is outside the matcher, so the guard never runs.
        let res = app.clone().oneshot(request("/admin", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app.oneshot(request("/admin/users", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn test_configured_redirect_status() {
        let mut config = GateConfig::default();
        config.guard.redirect_status = 302;
        let app = app(&config);

        let res = app.oneshot(request("/admin/orders", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_swap_takes_effect_for_next_request() {
        let config = GateConfig::default();
        let guard = shared_guard(GuardState::from_config(&config).unwrap());
        let app = Router::new()
            .fallback(|| async { "page" })
            .layer(middleware::from_fn_with_state(guard.clone(), route_guard_middleware));

        let res = app.clone().oneshot(request("/admin/x", Some("auth0=1"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

        let mut reloaded = config.clone();
        reloaded.guard.session_markers = vec!["auth0".into()];
        guard.store(Arc::new(GuardState::from_config(&reloaded).unwrap()));

        let res = app.oneshot(request("/admin/x", Some("auth0=1"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn test_invalid_status_falls_back_to_307() {
        let mut config = GateConfig::default();
        config.guard.redirect_status = 200;
        let state = GuardState::from_config(&config).unwrap();
        assert_eq!(state.redirect_status, StatusCode::TEMPORARY_REDIRECT);
    }
}
