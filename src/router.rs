use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use gatehouse_core::AppError;
use gatehouse_observability::{
    PrometheusHandle, logging_middleware, metrics_app, metrics_middleware,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::error::handle_errors;
use crate::modules::health::router::init_health_router;
use crate::modules::users::router::{init_admin_router, init_users_router};
use crate::state::AppState;

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

/// Builds the full application. `/metrics` is mounted only when a
/// Prometheus handle is given.
pub fn init_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/health", init_health_router())
        .nest(
            "/api",
            Router::new()
                .nest("/users", init_users_router(state.clone()))
                .nest("/admin", init_admin_router(state.clone())),
        )
        .fallback(route_not_found)
        .with_state(state.clone());

    if let Some(handle) = metrics {
        router = router.merge(metrics_app(handle));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.environment,
            handle_errors,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
