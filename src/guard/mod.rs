//! Admin route guard.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → GuardMatcher (config.guard.matcher), unmatched paths bypass
//!     → cookies.rs (collect cookie names from every Cookie header)
//!     → policy.rs (decide: Forward or Redirect)
//!     → origin.rs (absolute redirect URL on the request's origin)
//!     → middleware.rs (run the inner service or answer with the redirect)
//! ```
//!
//! # Design Decisions
//! - The decision is a pure function; no state survives a request
//! - Session detection is a presence check on cookie names by substring.
//!   Values are never validated; the upstream application owns real
//!   session verification.
//! - Missing or malformed cookies fail toward Redirect

pub mod cookies;
pub mod middleware;
pub mod origin;
pub mod policy;

pub use middleware::{route_guard_middleware, shared_guard, GuardState, SharedGuard};
pub use policy::{Decision, GuardPolicy};
