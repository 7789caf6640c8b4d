//! Shared utilities for integration tests.

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use oidc_discovery_proxy::kubernetes::{ClientFactory, ClusterApi, UpstreamError};
use tracing_subscriber::fmt::MakeWriter;

pub const DISCOVERY: &str = r#"{"issuer":"https://kubernetes.default.svc.cluster.local","jwks_uri":"https://kubernetes.default.svc.cluster.local/openid/v1/jwks","response_types_supported":["id_token"],"subject_types_supported":["public"],"id_token_signing_alg_values_supported":["RS256"]}"#;

pub const KEYSET: &str = r#"{"keys":[{"use":"sig","kty":"RSA","kid":"abc123","alg":"RS256","n":"0vx7agoebGcQSuu","e":"AQAB"}]}"#;

/// Scripted API server. `None` makes the call fail.
pub struct MockCluster {
    pub discovery: Option<String>,
    pub keyset: Option<String>,
    pub version: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockCluster {
    pub fn healthy() -> Self {
        Self {
            discovery: Some(DISCOVERY.to_string()),
            keyset: Some(KEYSET.to_string()),
            version: Some("v1.29.0".to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            discovery: None,
            keyset: None,
            version: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn with_keyset(mut self, body: &str) -> Self {
        self.keyset = Some(body.to_string());
        self
    }

    /// Stall every call by `delay` before answering.
    #[allow(dead_code)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(&self, value: &Option<String>) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        value.clone().ok_or(UpstreamError::NotConfigured)
    }
}

#[async_trait]
impl ClusterApi for MockCluster {
    async fn openid_configuration(&self) -> Result<String, UpstreamError> {
        self.answer(&self.discovery).await
    }

    async fn openid_keyset(&self) -> Result<String, UpstreamError> {
        self.answer(&self.keyset).await
    }

    async fn server_version(&self) -> Result<String, UpstreamError> {
        self.answer(&self.version).await
    }
}

/// Hands out the same mock on every resolution, or fails if `cluster` is `None`.
pub struct MockFactory {
    pub cluster: Option<Arc<MockCluster>>,
    resolutions: AtomicUsize,
}

impl MockFactory {
    pub fn new(cluster: MockCluster) -> Arc<Self> {
        Arc::new(Self {
            cluster: Some(Arc::new(cluster)),
            resolutions: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn unresolvable() -> Arc<Self> {
        Arc::new(Self {
            cluster: None,
            resolutions: AtomicUsize::new(0),
        })
    }

    #[allow(dead_code)]
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    /// Upstream calls made through the resolved handle.
    pub fn upstream_calls(&self) -> usize {
        self.cluster.as_ref().map_or(0, |c| c.calls())
    }
}

#[async_trait]
impl ClientFactory for MockFactory {
    async fn resolve(&self) -> Result<Arc<dyn ClusterApi>, UpstreamError> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        match &self.cluster {
            Some(cluster) => {
                let api: Arc<dyn ClusterApi> = cluster.clone();
                Ok(api)
            }
            None => Err(UpstreamError::NotConfigured),
        }
    }
}

/// GET request as it would arrive from `peer`.
#[allow(dead_code)]
pub fn get_from(path: &str, peer: SocketAddr) -> Request<Body> {
    let mut request = Request::get(path).body(Body::empty()).unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

#[allow(dead_code)]
pub fn get(path: &str) -> Request<Body> {
    get_from(path, "10.0.0.1:40000".parse().unwrap())
}

/// In-memory log sink for asserting on emitted events.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Route this thread's events here until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
