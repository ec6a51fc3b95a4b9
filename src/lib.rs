//! Admin gate: a gateway that fronts a web application and redirects admin
//! requests lacking an identity-provider session cookie to the login page.

pub mod config;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::GateConfig;
pub use guard::{Decision, GuardPolicy};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
