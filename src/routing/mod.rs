//! Routing subsystem.
//!
//! Decides which requests are routed through the guard at all.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (evaluate compiled patterns)
//!     → matched: run the route guard
//!     → not matched: forward untouched
//!
//! Pattern Compilation (at startup and on reload):
//!     GuardConfig.matcher
//!     → PathPattern per entry
//!     → Freeze as immutable GuardMatcher
//! ```

pub mod matcher;

pub use matcher::{GuardMatcher, PathPattern, PatternError};
