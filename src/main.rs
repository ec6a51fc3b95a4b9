//! Admin gate server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                    ADMIN GATE                    │
//!   Client Request   │  ┌──────────┐   ┌──────────┐   ┌─────────────┐   │
//!   ─────────────────┼─▶│ request  │──▶│ matcher  │──▶│ route guard │   │
//!                    │  │ id/trace │   │          │   │  (cookies)  │   │
//!                    │  └──────────┘   └────┬─────┘   └──┬───────┬──┘   │
//!                    │                      │ bypass     │forward│redirect
//!                    │                      ▼            ▼       ▼      │
//!                    │                 ┌───────────────────┐  307 to    │
//!   Client Response  │                 │ upstream forward  │  /admin/   │
//!   ◀────────────────┼─────────────────│                   │  login     │
//!                    │                 └─────────┬─────────┘            │
//!                    └───────────────────────────┼──────────────────────┘
//!                                                ▼
//!                                        Upstream web app
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use admin_gate::config::watcher::ConfigWatcher;
use admin_gate::config::{load_config, GateConfig};
use admin_gate::http::HttpServer;
use admin_gate::lifecycle::{signals, Shutdown};
use admin_gate::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "admin-gate", version, about = "Cookie-presence gate for an admin section")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("admin-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        matcher = ?config.guard.matcher,
        login_path = %config.guard.login_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server for reloads to keep flowing.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on(signals::wait_for_signal());

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
