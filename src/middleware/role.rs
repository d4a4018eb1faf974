//! Role-based authorization.
//!
//! Two ways to restrict a route by role:
//! 1. Layer-based, with [`require_roles`] and a [`RoleGuard`] as state
//! 2. Inside a handler, with [`check_role`] / [`check_any_role`]
//!
//! Both expect [`require_auth`](crate::middleware::auth::require_auth) to
//! have attached the caller first.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use gatehouse_auth::AuthenticatedUser;
use gatehouse_core::AppError;
use gatehouse_observability::{route_label, track_access_denied};
use tracing::debug;

use crate::middleware::auth::AuthUser;

pub const FORBIDDEN: &str = "Forbidden";

/// A fixed set of roles allowed through.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    permitted: Arc<[String]>,
}

impl RoleGuard {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permitted: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permits(&self, role: &str) -> bool {
        !role.is_empty() && self.permitted.iter().any(|r| r == role)
    }

    /// Passes only when a user is present and their role is in the set.
    pub fn check(&self, user: Option<&AuthenticatedUser>) -> Result<(), AppError> {
        match user {
            Some(user) if self.permits(&user.role) => Ok(()),
            _ => Err(AppError::forbidden(FORBIDDEN)),
        }
    }
}

/// Middleware that lets the request through only for permitted roles.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use crate::middleware::role::{RoleGuard, require_roles};
///
/// let admin_routes = Router::new()
///     .route("/users/{id}", get(get_user))
///     .route_layer(middleware::from_fn_with_state(RoleGuard::new(["admin"]), require_roles))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_roles(
    State(guard): State<RoleGuard>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req.extensions().get::<AuthenticatedUser>();

    if let Err(e) = guard.check(user) {
        let route = route_label(&req);
        debug!(
            role = user.map(|u| u.role.as_str()).unwrap_or_default(),
            path = %req.uri().path(),
            route = %route,
            "Role not permitted"
        );
        track_access_denied(&route);
        return Err(e);
    }

    Ok(next.run(req).await)
}

/// Helper to check a single role inside a handler.
pub fn check_role(auth_user: &AuthUser, role: &str) -> Result<(), AppError> {
    RoleGuard::new([role]).check(Some(&auth_user.0))
}

/// Helper to check if the user has any of the given roles.
pub fn check_any_role(auth_user: &AuthUser, roles: &[&str]) -> Result<(), AppError> {
    RoleGuard::new(roles.iter().copied()).check(Some(&auth_user.0))
}
