//! Gatehouse observability
//!
//! Provides:
//! - Console, file and JSON logging via `tracing`
//! - Distributed tracing via OpenTelemetry (when an OTLP endpoint is set)
//! - Metrics collection via Prometheus
//! - HTTP request/response logging middleware
//!
//! Compiled in with the `observability` feature (default). At runtime it can
//! be turned off with `OBSERVABILITY_ENABLED=false`, leaving console logging.
//! With the feature compiled out, the same functions exist as no-ops.

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

use axum::extract::{MatchedPath, Request};

/// Path label for requests that matched no route, e.g. 404s.
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// The route template the request matched (`/api/admin/users/{id}`), so
/// metric labels stay bounded no matter what clients send.
pub fn route_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
        .to_owned()
}

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_access_denied, track_auth_failure,
    track_auth_success,
};

#[cfg(not(feature = "observability"))]
pub use stubs::*;

// No-op stand-ins when the feature is compiled out
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    /// Placeholder so callers can name the type either way.
    #[derive(Clone, Debug)]
    pub struct PrometheusHandle;

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing(_environment: &str) {
        super::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn metrics_app<S>(_handle: PrometheusHandle) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new()
    }

    pub fn track_auth_success(_role: &str) {}

    pub fn track_auth_failure(_reason: &str) {}

    pub fn track_access_denied(_path: &str) {}
}
