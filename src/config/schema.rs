//! Configuration schema definitions.
//!
//! Every setting can come from the environment or a command-line flag.
//! The parsed value is immutable and shared with handlers via `Arc`.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};
use crate::security::{Granularity, RateLimitItem, RateLimitPolicy};

/// Default for `DEFAULT_RATE_LIMIT`.
pub const DEFAULT_RATE_LIMIT: &str = "10 per second";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable output for local development.
    Pretty,
}

/// Root configuration for the service.
#[derive(Debug, Clone, Parser)]
#[command(name = "oidc-discovery-proxy")]
#[command(
    version,
    about = "Republishes the cluster's service-account OIDC discovery document and JWKS"
)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    pub bind_address: SocketAddr,

    /// Per-client limit for the document routes, e.g. "10 per second".
    #[arg(long, env = "DEFAULT_RATE_LIMIT", default_value = DEFAULT_RATE_LIMIT)]
    pub default_rate_limit: RateLimitPolicy,

    /// Only serve documents to requests with exactly this User-Agent.
    #[arg(long, env = "ALLOWED_USER_AGENT")]
    pub allowed_user_agent: Option<String>,

    /// Seconds before an in-flight request is abandoned.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Serve Prometheus metrics on this address when set.
    #[arg(long, env = "METRICS_ADDRESS")]
    pub metrics_address: Option<SocketAddr>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            default_rate_limit: default_rate_limit(),
            allowed_user_agent: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_format: LogFormat::Json,
            metrics_address: None,
        }
    }
}

fn default_rate_limit() -> RateLimitPolicy {
    RateLimitPolicy::single(RateLimitItem {
        count: 10,
        multiple: 1,
        granularity: Granularity::Second,
    })
}
