//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): guard outcomes by decision (forward, redirect, bypass)
//! - `gate_requests_total` (counter): responses by status
//! - `gate_upstream_duration_seconds` (histogram): time spent waiting on the upstream

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(decision: &'static str) {
    counter!("gate_decisions_total", "decision" => decision).increment(1);
}

pub fn record_request(status: u16) {
    counter!("gate_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_upstream(start: Instant) {
    histogram!("gate_upstream_duration_seconds").record(start.elapsed().as_secs_f64());
}
