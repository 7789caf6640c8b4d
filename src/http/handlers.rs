//! Document endpoints.
//!
//! Both routes relay a JSON document from the API server. The body is parsed
//! only to guarantee it is JSON and is otherwise passed through untouched.

use axum::extract::State;
use serde_json::Value;

use crate::http::response::{ApiError, PrettyJson};
use crate::http::server::AppState;
use crate::kubernetes::{ClientFactory, Document, UpstreamError};

pub const OPENID_CONFIGURATION_PATH: &str = "/.well-known/openid-configuration";
pub const JWKS_PATH: &str = "/openid/v1/jwks";

/// `GET /.well-known/openid-configuration`
pub async fn openid_configuration(
    State(state): State<AppState>,
) -> Result<PrettyJson<Value>, ApiError> {
    relay(&state, Document::OpenidConfiguration).await
}

/// `GET /openid/v1/jwks`
pub async fn jwks(State(state): State<AppState>) -> Result<PrettyJson<Value>, ApiError> {
    relay(&state, Document::Keyset).await
}

async fn relay(state: &AppState, document: Document) -> Result<PrettyJson<Value>, ApiError> {
    fetch_document(state.clients.as_ref(), document)
        .await
        .map(PrettyJson)
        .map_err(|source| ApiError::upstream(document.api(), source))
}

async fn fetch_document(
    clients: &dyn ClientFactory,
    document: Document,
) -> Result<Value, UpstreamError> {
    let cluster = clients.resolve().await?;
    let raw = match document {
        Document::OpenidConfiguration => cluster.openid_configuration().await?,
        Document::Keyset => cluster.openid_keyset().await?,
    };
    Ok(serde_json::from_str(&raw)?)
}
