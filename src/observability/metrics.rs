//! Metrics collection and exposition.
//!
//! # Metrics
//! - `oidc_proxy_requests_total` (counter): requests by route, status
//! - `oidc_proxy_request_duration_seconds` (histogram): latency by route
//! - `oidc_proxy_rate_limited_total` (counter): rejected by the limiter
//! - `oidc_proxy_upstream_failures_total` (counter): failures by API group
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "oidc_proxy_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("oidc_proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    counter!("oidc_proxy_rate_limited_total").increment(1);
}

pub fn record_upstream_failure(api: &'static str) {
    counter!("oidc_proxy_upstream_failures_total", "api" => api).increment(1);
}
