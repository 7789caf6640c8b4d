//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the four routes
//! - Wire up middleware (request ID, access log, timeout, rate limit, User-Agent gate)
//! - Serve on a listener until shutdown is signalled

use axum::{middleware, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::config::ServiceConfig;
use crate::health::{liveness, readiness, LIVENESS_PATH, READINESS_PATH};
use crate::http::handlers::{jwks, openid_configuration, JWKS_PATH, OPENID_CONFIGURATION_PATH};
use crate::http::middleware::user_agent_middleware;
use crate::http::request::UuidRequestId;
use crate::kubernetes::ClientFactory;
use crate::observability::access_log_middleware;
use crate::security::{rate_limit_middleware, RateLimiter};

/// Server context injected into handlers and middleware.
///
/// Built once at startup; nothing in it is mutated afterwards except the
/// limiter's internal counters.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub clients: Arc<dyn ClientFactory>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: ServiceConfig, clients: Arc<dyn ClientFactory>) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.default_rate_limit.clone()));
        Self {
            config: Arc::new(config),
            clients,
            limiter,
        }
    }
}

/// HTTP server for the discovery endpoints.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, clients: Arc<dyn ClientFactory>) -> Self {
        let state = AppState::new(config, clients);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let timeout = Duration::from_secs(state.config.request_timeout_secs);

        // Layers run outermost-last: the limiter rejects before the
        // User-Agent gate is consulted.
        let documents = Router::new()
            .route(OPENID_CONFIGURATION_PATH, get(openid_configuration))
            .route(JWKS_PATH, get(jwks))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                user_agent_middleware,
            ))
            .route_layer(middleware::from_fn_with_state(
                state.limiter.clone(),
                rate_limit_middleware,
            ));

        let probes = Router::new()
            .route(LIVENESS_PATH, get(liveness))
            .route(READINESS_PATH, get(readiness));

        Router::new()
            .merge(documents)
            .merge(probes)
            .with_state(state)
            .layer(TimeoutLayer::new(timeout))
            .layer(middleware::from_fn(access_log_middleware))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until a value arrives on `shutdown`, then drain
    /// in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit = %self.state.config.default_rate_limit,
            user_agent_gate = self.state.config.allowed_user_agent.is_some(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
