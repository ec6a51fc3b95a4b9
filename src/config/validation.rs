//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse and guard paths are consistent
//! - Validate value ranges (timeouts > 0, redirect status)
//! - Compile matcher patterns ahead of time
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::routing::matcher::PathPattern;

const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.address: expected host:port, got '{0}'")]
    InvalidUpstream(String),

    #[error("listener.default_scheme: expected 'http' or 'https', got '{0}'")]
    InvalidScheme(String),

    #[error("guard.protected_prefix: must start with '/', got '{0}'")]
    InvalidPrefix(String),

    #[error("guard.login_path: '{login_path}' is not under protected prefix '{prefix}'")]
    LoginOutsidePrefix { login_path: String, prefix: String },

    #[error("guard.session_markers: at least one non-empty marker is required")]
    NoSessionMarkers,

    #[error("guard.matcher: {0}")]
    InvalidPattern(String),

    #[error("guard.redirect_status: {0} is not a redirect status")]
    InvalidRedirectStatus(u16),

    #[error("timeouts.request_secs: must be greater than zero")]
    ZeroTimeout,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    // Host names are fine here; the forwarding client resolves them per connection.
    if Authority::from_str(&config.upstream.address).is_err() {
        errors.push(ValidationError::InvalidUpstream(
            config.upstream.address.clone(),
        ));
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let scheme = config.listener.default_scheme.as_str();
    if scheme != "http" && scheme != "https" {
        errors.push(ValidationError::InvalidScheme(scheme.to_string()));
    }

    let guard = &config.guard;
    if !guard.protected_prefix.starts_with('/') {
        errors.push(ValidationError::InvalidPrefix(guard.protected_prefix.clone()));
    } else if !guard.login_path.starts_with(&guard.protected_prefix) {
        errors.push(ValidationError::LoginOutsidePrefix {
            login_path: guard.login_path.clone(),
            prefix: guard.protected_prefix.clone(),
        });
    }

    if !guard.session_markers.iter().any(|m| !m.is_empty()) {
        errors.push(ValidationError::NoSessionMarkers);
    }

    for pattern in &guard.matcher {
        if let Err(e) = PathPattern::parse(pattern) {
            errors.push(ValidationError::InvalidPattern(e.to_string()));
        }
    }

    if !REDIRECT_STATUSES.contains(&guard.redirect_status) {
        errors.push(ValidationError::InvalidRedirectStatus(guard.redirect_status));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
