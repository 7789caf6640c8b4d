//! Mapping of handler outcomes to HTTP responses.
//!
//! Handlers return `Result<_, ApiError>`; this is the only place where an
//! error becomes a status code and body, and where upstream failures are
//! logged.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::kubernetes::{UpstreamApi, UpstreamError};
use crate::observability::metrics;

pub const FORBIDDEN_BODY: &str = "Forbidden";
pub const INTERNAL_ERROR_BODY: &str = "Internal error check logs";
pub const UNHEALTHY_BODY: &str = "I am unhealthy!";

/// Errors a handler can surface to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `User-Agent` did not match the allowed value.
    #[error("User-Agent not allowed")]
    AccessDenied,

    /// Credential loading, the API call or JSON decoding failed.
    #[error("kubernetes.client.{api}.Exception: {source}")]
    UpstreamFailure {
        api: UpstreamApi,
        #[source]
        source: UpstreamError,
    },
}

impl ApiError {
    pub fn upstream(api: UpstreamApi, source: UpstreamError) -> Self {
        ApiError::UpstreamFailure { api, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AccessDenied => StatusCode::FORBIDDEN,
            ApiError::UpstreamFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> &'static str {
        match self {
            ApiError::AccessDenied => FORBIDDEN_BODY,
            ApiError::UpstreamFailure {
                api: UpstreamApi::Version,
                ..
            } => UNHEALTHY_BODY,
            ApiError::UpstreamFailure { .. } => INTERNAL_ERROR_BODY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::UpstreamFailure { api, .. } = &self {
            if *api == UpstreamApi::Version {
                tracing::error!("Health check failed!");
            }
            tracing::error!(api = %api, "{}", self);
            metrics::record_upstream_failure(api.name());
        }

        (self.status(), self.body()).into_response()
    }
}

/// JSON response body, pretty-printed with a trailing newline.
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.0) {
            Ok(mut body) => {
                body.push(b'\n');
                ([(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize response body");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn access_denied_is_a_plain_403() {
        let response = ApiError::AccessDenied.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_of(response).await, "Forbidden");
    }

    #[tokio::test]
    async fn document_failures_hide_the_cause() {
        let err = ApiError::upstream(UpstreamApi::Openid, UpstreamError::NotConfigured);
        assert!(err
            .to_string()
            .starts_with("kubernetes.client.OpenidApi.Exception: "));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, "Internal error check logs");
    }

    #[tokio::test]
    async fn version_failures_report_unhealthy() {
        let response =
            ApiError::upstream(UpstreamApi::Version, UpstreamError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, "I am unhealthy!");
    }

    #[tokio::test]
    async fn pretty_json_is_indented() {
        let response = PrettyJson(serde_json::json!({"issuer": "https://kubernetes.default.svc"}))
            .into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            body_of(response).await,
            "{\n  \"issuer\": \"https://kubernetes.default.svc\"\n}\n"
        );
    }
}
