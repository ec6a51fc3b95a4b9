//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the forwarding fallback
//! - Wire up middleware (route guard, body limit, request ID, tracing)
//! - Bind server to listener
//! - Apply guard reloads from the config watcher
//! - Stop on the shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{uri::InvalidUri, Request},
    middleware::{self, Next},
    response::Response,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::GateConfig;
use crate::guard::{route_guard_middleware, shared_guard, GuardState, SharedGuard};
use crate::http::forward::{forward_handler, Upstream};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::routing::PatternError;

/// Errors building the server from a configuration.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream address '{address}': {source}")]
    InvalidUpstream {
        address: String,
        #[source]
        source: InvalidUri,
    },

    #[error("invalid guard matcher: {0}")]
    InvalidMatcher(#[from] PatternError),
}

/// HTTP server for the admin gate.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
    guard: SharedGuard,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Result<Self, ServerError> {
        let upstream = Upstream::new(
            &config.upstream.address,
            Duration::from_secs(config.timeouts.request_secs),
        )
        .map_err(|source| ServerError::InvalidUpstream {
            address: config.upstream.address.clone(),
            source,
        })?;
        let guard = shared_guard(GuardState::from_config(&config)?);

        let router = Self::build_router(&config, upstream, guard.clone());
        Ok(Self {
            router,
            config,
            guard,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GateConfig, upstream: Upstream, guard: SharedGuard) -> Router {
        Router::new()
            .fallback(forward_handler)
            .with_state(upstream)
            .layer(middleware::from_fn_with_state(guard, route_guard_middleware))
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(middleware::from_fn(record_status))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        let reloader = tokio::spawn(apply_reloads(
            self.guard.clone(),
            self.config.clone(),
            config_updates,
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Swap in the guard state from each reloaded config.
///
/// Listener and upstream settings are bound at startup and only take effect
/// after a restart.
async fn apply_reloads(
    guard: SharedGuard,
    current: GateConfig,
    mut updates: mpsc::UnboundedReceiver<GateConfig>,
) {
    while let Some(config) = updates.recv().await {
        if config.listener != current.listener
            || config.upstream != current.upstream
            || config.timeouts != current.timeouts
            || config.security != current.security
        {
            tracing::warn!("Listener, upstream, timeout and limit changes require a restart");
        }

        match GuardState::from_config(&config) {
            Ok(state) => {
                guard.store(Arc::new(state));
                tracing::info!(
                    matcher = ?config.guard.matcher,
                    markers = ?config.guard.session_markers,
                    "Guard configuration reloaded"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Rejected guard reload, keeping current configuration");
            }
        }
    }
}

async fn record_status(req: Request<Body>, next: Next) -> Response {
    let response = next.run(req).await;
    metrics::record_request(response.status().as_u16());
    response
}
