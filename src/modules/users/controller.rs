use axum::extract::{Path, State};
use gatehouse_auth::AuthenticatedUser;
use gatehouse_core::{ApiResponse, AppError, ErrorResponse};
use gatehouse_models::{LookupUserRequest, User};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

const USER_NOT_FOUND: &str = "User not found";

/// Get the authenticated caller
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "The caller, inside the success envelope", body = AuthenticatedUser),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 404, description = "Token owner no longer exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.0.id))]
pub async fn get_me(auth_user: AuthUser) -> ApiResponse<AuthenticatedUser> {
    ApiResponse::ok(auth_user.0)
}

/// Get a user by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Malformed user ID", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::bad_request("Invalid user ID"))?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

    Ok(ApiResponse::ok(user))
}

/// Find a user by email (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/users/lookup",
    request_body = LookupUserRequest,
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Malformed body or invalid email", body = ErrorResponse),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state, request))]
pub async fn lookup_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LookupUserRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

    Ok(ApiResponse::ok(user))
}
