use axum::{Router, routing::get};

use crate::modules::health::controller::{health_check, health_ready};
use crate::state::AppState;

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}
