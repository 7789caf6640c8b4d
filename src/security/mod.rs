//! Request admission.
//!
//! # Data Flow
//! ```text
//! DEFAULT_RATE_LIMIT
//!     → rate_policy.rs (parse "<count> per <unit>" items at startup)
//!     → rate_limit.rs  (fixed windows per client IP)
//!     → 429 + Retry-After, or pass to the handler
//! ```
//!
//! # Design Decisions
//! - Only the document routes are limited; health probes are exempt
//! - Counters are process-local; replicas limit independently
//! - A rejected request never reaches the handler

pub mod rate_limit;
pub mod rate_policy;

pub use rate_limit::{rate_limit_middleware, Decision, RateLimiter};
pub use rate_policy::{Granularity, RateLimitItem, RateLimitParseError, RateLimitPolicy};
