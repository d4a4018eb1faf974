use axum::{
    Router, middleware,
    routing::{get, post},
};
use gatehouse_models::roles;

use crate::middleware::auth::require_auth;
use crate::middleware::role::{RoleGuard, require_roles};
use crate::modules::users::controller::{get_me, get_user, lookup_user};
use crate::state::AppState;

/// Routes for any authenticated user.
pub fn init_users_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

/// Routes restricted to admins.
pub fn init_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/lookup", post(lookup_user))
        .route("/users/{id}", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::new([roles::ADMIN]),
            require_roles,
        ))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
