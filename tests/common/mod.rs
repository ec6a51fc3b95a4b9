//! Shared utilities for integration tests.

use std::net::SocketAddr;

use admin_gate::config::GateConfig;
use admin_gate::http::HttpServer;
use admin_gate::lifecycle::Shutdown;
use axum::{body::Body, http::Request, Router};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Start an upstream that echoes what it received:
/// `METHOD PATH?QUERY | cookie=... | x-request-id=... | BODY`.
pub async fn start_echo_upstream() -> SocketAddr {
    let app = Router::new().fallback(|req: Request<Body>| async move {
        let line = {
            let header = |name: &str| {
                req.headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string()
            };
            format!(
                "{} {} | cookie={} | x-request-id={}",
                req.method(),
                req.uri(),
                header("cookie"),
                header("x-request-id"),
            )
        };
        let body = axum::body::to_bytes(req.into_body(), 1024 * 1024)
            .await
            .unwrap_or_default();
        format!("{line} | {}", String::from_utf8_lossy(&body))
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A running gate under test.
pub struct TestGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<GateConfig>,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

impl TestGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.task.await.unwrap().unwrap();
    }
}

/// Start a gate in front of `upstream` with `configure` applied to the defaults.
pub async fn start_gate(upstream: SocketAddr, configure: impl FnOnce(&mut GateConfig)) -> TestGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = GateConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.address = upstream.to_string();
    configure(&mut config);

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    let task = tokio::spawn(async move { server.run(listener, updates_rx, server_shutdown).await });

    TestGate {
        addr,
        shutdown,
        config_updates,
        task,
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
