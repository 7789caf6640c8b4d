//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → access_log.rs (one event per non-probe request)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod access_log;
pub mod logging;
pub mod metrics;

pub use access_log::access_log_middleware;
pub use logging::init_logging;
