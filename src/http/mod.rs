//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID assigned or kept)
//!     → guard (forward or redirect)
//!     → forward.rs (send to upstream, stream response back)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod server;

pub use forward::Upstream;
pub use request::{request_id, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
