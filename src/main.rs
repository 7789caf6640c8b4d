//! OIDC discovery proxy.
//!
//! ```text
//!     Client ──▶ request id ──▶ access log ──▶ timeout ──┬──▶ rate limit ──▶ User-Agent ──▶ document handler ──┐
//!                                                       │                                                     │
//!                                                       └──▶ /livez, /readyz ─────────────────────────────────┤
//!                                                                                                             ▼
//!                                                                                          Kubernetes API server
//! ```

use oidc_discovery_proxy::config::{load_config, ConfigError};
use oidc_discovery_proxy::lifecycle::startup;
use oidc_discovery_proxy::observability::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match load_config() {
        Ok(config) => config,
        Err(ConfigError::Cli(err)) => err.exit(),
        Err(err) => return Err(err.into()),
    };

    init_logging(config.log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.bind_address,
        rate_limit = %config.default_rate_limit,
        request_timeout_secs = config.request_timeout_secs,
        metrics_address = ?config.metrics_address,
        "oidc-discovery-proxy starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
