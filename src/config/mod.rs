//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! environment variables / CLI flags
//!     → schema.rs (clap parse, rate limit parsed here)
//!     → validation.rs (normalise + semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc with handlers and middleware
//! ```
//!
//! # Design Decisions
//! - Read once at startup; no reload
//! - All fields have defaults so the service starts with no configuration
//! - A configuration error is the only fatal startup error

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_from, ConfigError};
pub use schema::{LogFormat, ServiceConfig, DEFAULT_RATE_LIMIT};
pub use validation::ValidationError;
