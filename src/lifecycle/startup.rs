//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when configured
//! - Bind the listener and hand it to the HTTP server
//! - Translate OS signals into a graceful shutdown
//!
//! # Design Decisions
//! - Fail fast: binding or exporter errors are fatal
//! - Kubernetes credentials are not touched here; they are resolved per request

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::kubernetes::{ClientFactory, KubeClientFactory};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("metrics exporter failed to start: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the service with the Kubernetes-backed client factory until a
/// termination signal arrives.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    run_with(config, Arc::new(KubeClientFactory::new())).await
}

pub async fn run_with(
    config: ServiceConfig,
    clients: Arc<dyn ClientFactory>,
) -> Result<(), StartupError> {
    if let Some(addr) = config.metrics_address {
        metrics::init_metrics(addr)?;
    }

    let addr = config.bind_address;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        signal_shutdown.trigger();
    });

    HttpServer::new(config, clients)
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)
}
