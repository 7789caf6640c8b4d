//! Credential resolution.
//!
//! # Responsibilities
//! - Decide between in-cluster credentials and a local kubeconfig
//! - Build a `kube::Client` and wrap it as a `ClusterApi`
//!
//! # Design Decisions
//! - In-cluster loading errors propagate to the caller (→ 500)
//! - Kubeconfig loading errors are logged and swallowed; the returned
//!   handle is unconfigured and fails on first use

use std::ffi::OsStr;
use std::sync::Arc;

use async_trait::async_trait;
use kube::config::KubeConfigOptions;
use kube::{Client, Config};

use crate::kubernetes::client::{ClusterApi, KubeClusterApi};
use crate::kubernetes::error::UpstreamError;

/// Presence of this variable means we are running inside a pod.
pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";

/// Produces a handle able to issue the upstream calls.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn resolve(&self) -> Result<Arc<dyn ClusterApi>, UpstreamError>;
}

/// Where credentials are loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Mounted service-account token and CA bundle.
    InCluster,
    /// Local kubeconfig file (`KUBECONFIG` or `~/.kube/config`).
    Kubeconfig,
}

impl CredentialSource {
    /// Inspect the process environment.
    pub fn detect() -> Self {
        Self::from_service_host(std::env::var_os(SERVICE_HOST_ENV).as_deref())
    }

    fn from_service_host(service_host: Option<&OsStr>) -> Self {
        match service_host {
            Some(_) => CredentialSource::InCluster,
            None => CredentialSource::Kubeconfig,
        }
    }
}

/// Resolves a fresh `kube::Client` on every call.
#[derive(Debug, Clone, Default)]
pub struct KubeClientFactory;

impl KubeClientFactory {
    pub fn new() -> Self {
        Self
    }

    async fn load_config(source: CredentialSource) -> Result<Option<Config>, UpstreamError> {
        match source {
            CredentialSource::InCluster => Ok(Some(Config::incluster()?)),
            CredentialSource::Kubeconfig => {
                match Config::from_kubeconfig(&KubeConfigOptions::default()).await {
                    Ok(config) => Ok(Some(config)),
                    Err(err) => {
                        tracing::error!(error = %err, "Kubeconfig could not be loaded");
                        Ok(None)
                    }
                }
            }
        }
    }
}

#[async_trait]
impl ClientFactory for KubeClientFactory {
    async fn resolve(&self) -> Result<Arc<dyn ClusterApi>, UpstreamError> {
        let source = CredentialSource::detect();
        tracing::debug!(source = ?source, "Resolving Kubernetes client");

        let api = match Self::load_config(source).await? {
            Some(config) => {
                KubeClusterApi::new(Client::try_from(config).map_err(UpstreamError::Client)?)
            }
            None => KubeClusterApi::unconfigured(),
        };
        Ok(Arc::new(api))
    }
}
