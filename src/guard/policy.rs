//! The route guard decision.
//!
//! A pure function of (path, cookie names). It never inspects cookie values,
//! signatures or expiry: a cookie whose name contains one of the configured
//! markers is taken as evidence that the identity provider has a session.

use serde::Serialize;

use crate::config::GuardConfig;

/// Outcome of running the guard for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Pass the request through unchanged.
    Forward,
    /// Send the client to `target` (a path on the request's own origin).
    Redirect { target: String },
}

impl Decision {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Forward => "forward",
            Decision::Redirect { .. } => "redirect",
        }
    }
}

/// Paths and markers the guard decides with. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    protected_prefix: String,
    login_path: String,
    session_markers: Vec<String>,
}

impl GuardPolicy {
    /// Build a policy. Empty markers are dropped since every name contains them.
    pub fn new(
        protected_prefix: impl Into<String>,
        login_path: impl Into<String>,
        session_markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            protected_prefix: protected_prefix.into(),
            login_path: login_path.into(),
            session_markers: session_markers
                .into_iter()
                .map(Into::<String>::into)
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(
            config.protected_prefix.as_str(),
            config.login_path.as_str(),
            config.session_markers.iter().map(String::as_str),
        )
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// True if any cookie name contains any marker (substring, case-sensitive).
    pub fn has_session<'a>(&self, cookie_names: impl IntoIterator<Item = &'a str>) -> bool {
        cookie_names.into_iter().any(|name| {
            self.session_markers
                .iter()
                .any(|marker| name.contains(marker.as_str()))
        })
    }

    /// Decide what to do with a request for `path` carrying `cookie_names`.
    pub fn decide<'a>(
        &self,
        path: &str,
        cookie_names: impl IntoIterator<Item = &'a str>,
    ) -> Decision {
        if !path.starts_with(&self.protected_prefix) {
            return Decision::Forward;
        }

        // The login page stays reachable without a session.
        if path == self.login_path {
            return Decision::Forward;
        }

        if self.has_session(cookie_names) {
            Decision::Forward
        } else {
            Decision::Redirect {
                target: self.login_path.clone(),
            }
        }
    }
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}
