//! The upstream operations the service relies on.

use std::fmt;

use async_trait::async_trait;
use kube::Client;

use crate::kubernetes::error::UpstreamError;

/// API server path of the service-account issuer discovery document.
pub const OPENID_CONFIGURATION_PATH: &str = "/.well-known/openid-configuration";

/// API server path of the service-account issuer key set.
pub const OPENID_KEYSET_PATH: &str = "/openid/v1/jwks";

/// Upstream API group a call belongs to. Used to tag failure logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamApi {
    WellKnown,
    Openid,
    Version,
}

impl UpstreamApi {
    pub fn name(self) -> &'static str {
        match self {
            UpstreamApi::WellKnown => "WellKnownApi",
            UpstreamApi::Openid => "OpenidApi",
            UpstreamApi::Version => "VersionApi",
        }
    }
}

impl fmt::Display for UpstreamApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A JSON document republished verbatim from the API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    /// OIDC discovery document.
    OpenidConfiguration,
    /// JSON Web Key Set for service-account tokens.
    Keyset,
}

impl Document {
    pub fn api(self) -> UpstreamApi {
        match self {
            Document::OpenidConfiguration => UpstreamApi::WellKnown,
            Document::Keyset => UpstreamApi::Openid,
        }
    }
}

/// Narrow view of the Kubernetes API server.
///
/// Document calls return the raw response body; decoding is left to the
/// caller so the payload can be relayed without reinterpretation.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Service-account issuer OpenID configuration.
    async fn openid_configuration(&self) -> Result<String, UpstreamError>;

    /// Service-account issuer OpenID key set.
    async fn openid_keyset(&self) -> Result<String, UpstreamError>;

    /// Server `gitVersion`, e.g. `v1.29.0`.
    async fn server_version(&self) -> Result<String, UpstreamError>;
}

/// `ClusterApi` backed by a `kube::Client`.
///
/// Holds no client when credentials could not be loaded; every call then
/// fails with [`UpstreamError::NotConfigured`].
#[derive(Clone)]
pub struct KubeClusterApi {
    client: Option<Client>,
}

impl KubeClusterApi {
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    fn client(&self) -> Result<&Client, UpstreamError> {
        self.client.as_ref().ok_or(UpstreamError::NotConfigured)
    }

    async fn get_text(&self, path: &str) -> Result<String, UpstreamError> {
        let client = self.client()?;
        let request = http::Request::get(path).body(Vec::new())?;
        client.request_text(request).await.map_err(UpstreamError::Api)
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    async fn openid_configuration(&self) -> Result<String, UpstreamError> {
        self.get_text(OPENID_CONFIGURATION_PATH).await
    }

    async fn openid_keyset(&self) -> Result<String, UpstreamError> {
        self.get_text(OPENID_KEYSET_PATH).await
    }

    async fn server_version(&self) -> Result<String, UpstreamError> {
        let info = self
            .client()?
            .apiserver_version()
            .await
            .map_err(UpstreamError::Api)?;
        Ok(info.git_version)
    }
}
