//! Kubernetes API access.
//!
//! # Data Flow
//! ```text
//! handler
//!     → resolver.rs (ClientFactory: in-cluster or kubeconfig credentials)
//!     → client.rs   (ClusterApi: the three upstream calls)
//!     → raw JSON text / version string back to the handler
//! ```
//!
//! # Design Decisions
//! - Handlers only see the narrow `ClusterApi` trait, never `kube::Client`
//! - A client is resolved per request; nothing is cached between requests
//! - A kubeconfig that fails to load is logged, not fatal; the failure
//!   surfaces on the first API call instead

pub mod client;
pub mod error;
pub mod resolver;

pub use client::{ClusterApi, Document, KubeClusterApi, UpstreamApi};
pub use error::UpstreamError;
pub use resolver::{ClientFactory, CredentialSource, KubeClientFactory};
