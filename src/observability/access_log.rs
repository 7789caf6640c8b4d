//! Per-request access log.
//!
//! One event per request on the `access` target, carrying the fields of the
//! JSON access format (remote_ip, method, path, status, user_agent, referer,
//! duration_in_ms, request_id). Health-probe traffic is counted in metrics
//! but kept out of the log.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::health::{LIVENESS_PATH, READINESS_PATH};
use crate::http::handlers::{JWKS_PATH, OPENID_CONFIGURATION_PATH};
use crate::http::request::request_id;
use crate::observability::metrics;

/// Paths whose requests never reach the access log.
pub const SUPPRESSED_PATHS: [&str; 2] = [LIVENESS_PATH, READINESS_PATH];

pub fn is_suppressed(path: &str) -> bool {
    SUPPRESSED_PATHS.contains(&path)
}

/// Bounded label set for metrics.
pub fn route_label(path: &str) -> &'static str {
    match path {
        OPENID_CONFIGURATION_PATH => OPENID_CONFIGURATION_PATH,
        JWKS_PATH => JWKS_PATH,
        LIVENESS_PATH => LIVENESS_PATH,
        READINESS_PATH => READINESS_PATH,
        _ => "unmatched",
    }
}

/// Client address as reported to the log: first `X-Forwarded-For` hop,
/// falling back to the socket peer.
pub fn remote_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "-".to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();
    let route = route_label(&path);

    if is_suppressed(&path) {
        let response = next.run(request).await;
        metrics::record_request(route, response.status().as_u16(), start);
        return response;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let headers = request.headers();
    let remote_ip = remote_ip(headers, peer);
    let user_agent = header_str(headers, header::USER_AGENT).to_string();
    let referer = header_str(headers, header::REFERER).to_string();
    let request_id = request_id(headers).to_string();
    let method = request.method().clone();
    let full_path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or(path);

    let response = next.run(request).await;
    let status = response.status().as_u16();

    tracing::info!(
        target: "access",
        remote_ip = %remote_ip,
        method = %method,
        path = %full_path,
        status = status,
        user_agent = %user_agent,
        referer = %referer,
        duration_in_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        "request completed"
    );
    metrics::record_request(route, status, start);

    response
}
