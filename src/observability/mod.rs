//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing, filterable with RUST_LOG
//! - Request ID flows through logs and upstream requests
//! - Metrics are cheap (no-ops until a recorder is installed)

pub mod logging;
pub mod metrics;
