//! Errors raised while talking to the Kubernetes API server.

use thiserror::Error;

/// Any failure between resolving credentials and decoding the upstream payload.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// In-cluster service-account credentials could not be loaded.
    #[error("in-cluster configuration could not be loaded: {0}")]
    InCluster(#[from] kube::config::InClusterError),

    /// Kubeconfig loading failed earlier, so there is no usable client.
    #[error("Kubernetes client is not configured: no kubeconfig could be loaded")]
    NotConfigured,

    /// The `kube::Client` could not be built from the loaded configuration.
    #[error("Kubernetes client could not be created: {0}")]
    Client(#[source] kube::Error),

    /// The API call itself failed (transport, TLS, auth or a non-2xx status).
    #[error("Kubernetes API request failed: {0}")]
    Api(#[source] kube::Error),

    /// The outgoing request could not be assembled.
    #[error("invalid Kubernetes API request: {0}")]
    Request(#[from] http::Error),

    /// The upstream body was not valid JSON.
    #[error("Kubernetes API returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
