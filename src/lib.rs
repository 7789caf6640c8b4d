//! OIDC discovery proxy for Kubernetes service-account tokens.
//!
//! Republishes the cluster's issuer discovery document and JWKS over plain
//! HTTP so external relying parties can validate projected tokens, plus
//! liveness and readiness probes.

pub mod config;
pub mod health;
pub mod http;
pub mod kubernetes;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
