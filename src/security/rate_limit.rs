//! Per-client fixed-window rate limiting.

use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::observability::metrics;
use crate::security::rate_policy::{RateLimitItem, RateLimitPolicy};

/// Number of tracked clients above which idle entries are swept.
const SWEEP_THRESHOLD: usize = 10_000;

/// Minimum time between two sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Hit counter for one limit item.
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u64,
}

impl Window {
    fn new(now: Instant) -> Self {
        Self {
            started: now,
            hits: 0,
        }
    }

    fn is_expired(&self, item: &RateLimitItem, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= item.window()
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Limited {
        limit: RateLimitItem,
        retry_after: Duration,
    },
}

/// In-memory limiter keyed by client address.
///
/// Each window opens on the first hit and closes once its period has
/// elapsed. Rejected requests are not counted.
pub struct RateLimiter {
    policy: RateLimitPolicy,
    windows: DashMap<IpAddr, Vec<Window>>,
    sweep_threshold: usize,
    created: Instant,
    /// Earliest next sweep, in milliseconds since `created`.
    next_sweep_ms: AtomicU64,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_sweep_threshold(policy, SWEEP_THRESHOLD)
    }

    fn with_sweep_threshold(policy: RateLimitPolicy, sweep_threshold: usize) -> Self {
        Self {
            policy,
            windows: DashMap::new(),
            sweep_threshold,
            created: Instant::now(),
            next_sweep_ms: AtomicU64::new(0),
        }
    }

    /// Record a hit for `client` unless one of the limits is exhausted.
    pub fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        if self.windows.len() > self.sweep_threshold {
            self.maybe_sweep(now);
        }

        let items = self.policy.items();
        let mut windows = self
            .windows
            .entry(client)
            .or_insert_with(|| vec![Window::new(now); items.len()]);

        for (item, window) in items.iter().zip(windows.iter_mut()) {
            if window.is_expired(item, now) {
                *window = Window::new(now);
            }
            if window.hits >= item.count {
                let elapsed = now.saturating_duration_since(window.started);
                return Decision::Limited {
                    limit: *item,
                    retry_after: item.window().saturating_sub(elapsed),
                };
            }
        }

        for window in windows.iter_mut() {
            window.hits += 1;
        }
        Decision::Allowed
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Sweep at most once per `SWEEP_INTERVAL`; concurrent callers skip.
    fn maybe_sweep(&self, now: Instant) {
        let now_ms = now.saturating_duration_since(self.created).as_millis() as u64;
        let due = self.next_sweep_ms.load(Ordering::Relaxed);
        if now_ms < due {
            return;
        }
        let next = now_ms + SWEEP_INTERVAL.as_millis() as u64;
        if self
            .next_sweep_ms
            .compare_exchange(due, next, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.sweep(now);
        }
    }

    fn sweep(&self, now: Instant) {
        let items = self.policy.items();
        self.windows.retain(|_, windows| {
            items
                .iter()
                .zip(windows.iter())
                .any(|(item, window)| !window.is_expired(item, now))
        });
    }
}

/// Whole seconds for a `Retry-After` header, rounded up.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// Middleware enforcing the configured limit on the wrapped routes.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match limiter.check(addr.ip()) {
        Decision::Allowed => next.run(request).await,
        Decision::Limited { limit, retry_after } => {
            tracing::warn!(
                client = %addr.ip(),
                path = %request.uri().path(),
                limit = %limit,
                "Rate limit exceeded"
            );
            metrics::record_rate_limited();
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs(retry_after).to_string())],
                format!("Too Many Requests: {limit}"),
            )
                .into_response()
        }
    }
}
