//! User-Agent allow-list for the document routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Whether a request presenting `user_agent` may proceed.
///
/// With no allowed value configured every request passes, including ones
/// without the header. Otherwise the header must match byte for byte.
pub fn user_agent_allowed(allowed: Option<&str>, user_agent: Option<&[u8]>) -> bool {
    match allowed {
        None => true,
        Some(allowed) => user_agent == Some(allowed.as_bytes()),
    }
}

pub async fn user_agent_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::USER_AGENT)
        .map(|v| v.as_bytes());

    if !user_agent_allowed(state.config.allowed_user_agent.as_deref(), presented) {
        tracing::debug!(path = %request.uri().path(), "User-Agent rejected");
        return ApiError::AccessDenied.into_response();
    }

    next.run(request).await
}
