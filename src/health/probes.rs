//! Kubernetes probe handlers.
//!
//! Neither route is rate limited. Liveness reaches the API server;
//! readiness does not.

use axum::extract::State;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::kubernetes::{ClientFactory, UpstreamApi, UpstreamError};

pub const LIVENESS_PATH: &str = "/livez";
pub const READINESS_PATH: &str = "/readyz";

pub const READY_BODY: &str = "I am ready!";

/// `GET /livez`: healthy when the API server reports its version.
pub async fn liveness(State(state): State<AppState>) -> Result<String, ApiError> {
    let version = server_version(state.clients.as_ref())
        .await
        .map_err(|source| ApiError::upstream(UpstreamApi::Version, source))?;

    Ok(healthy_message(&version))
}

/// `GET /readyz`: always ready, with no upstream check.
pub async fn readiness() -> &'static str {
    READY_BODY
}

async fn server_version(clients: &dyn ClientFactory) -> Result<String, UpstreamError> {
    clients.resolve().await?.server_version().await
}

fn healthy_message(version: &str) -> String {
    format!("I am healthy! Running on Kubernetes version {version}.")
}
