//! Request authentication against issued token records.
//!
//! A bearer token is accepted only when all of the following hold:
//!
//! 1. the `Authorization` header is present,
//! 2. the token verifies (signature, shape, UUID subject),
//! 3. an `auth` token record exists for that token and user,
//! 4. the record is younger than the configured expiration window,
//! 5. the user still exists.
//!
//! An expired record is deleted before the request is rejected. Store
//! failures are logged and surface as a bare 500 so their messages never
//! reach the client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use gatehouse_core::AppError;
use gatehouse_db::{StoreError, TokenStore, UserStore};
use gatehouse_models::{TokenType, User};

use crate::jwt::TokenVerifier;

pub const TOKEN_NOT_PROVIDED: &str = "Token not provided";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const TOKEN_EXPIRED: &str = "Token expired";
pub const USER_NOT_FOUND: &str = "User not found";

/// The authenticated caller, attached to the request for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Clone)]
pub struct Authenticator {
    verifier: TokenVerifier,
    tokens: Arc<dyn TokenStore>,
    users: Arc<dyn UserStore>,
    window: Duration,
}

impl Authenticator {
    pub fn new(
        verifier: TokenVerifier,
        tokens: Arc<dyn TokenStore>,
        users: Arc<dyn UserStore>,
        window: Duration,
    ) -> Self {
        Self {
            verifier,
            tokens,
            users,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Authenticates an `Authorization` header value at the current time.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<AuthenticatedUser, AppError> {
        self.authenticate_at(authorization, Utc::now()).await
    }

    #[instrument(skip_all)]
    pub async fn authenticate_at(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedUser, AppError> {
        let header = authorization.ok_or_else(|| AppError::unauthorized(TOKEN_NOT_PROVIDED))?;
        let token = bearer_token(header)?;

        let verified = self
            .verifier
            .verify(token)
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

        let record = self
            .tokens
            .find_one(token, verified.id, TokenType::Auth)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

        if record.is_expired_at(now, self.window) {
            self.tokens
                .delete(&record.token)
                .await
                .map_err(store_failure)?;
            debug!(
                user_id = %record.user_id,
                expired_at = %record.expires_at(self.window),
                "Deleted expired token"
            );
            return Err(AppError::unauthorized(TOKEN_EXPIRED));
        }

        let user = self
            .users
            .find_by_id(verified.id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        Ok(user.into())
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

/// Extracts the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. An empty token counts as no
/// token at all; any other scheme is an invalid token.
pub fn bearer_token(header: &str) -> Result<&str, AppError> {
    let header = header.trim();
    let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::unauthorized(INVALID_TOKEN));
    }

    match token.trim() {
        "" => Err(AppError::unauthorized(TOKEN_NOT_PROVIDED)),
        token => Ok(token),
    }
}

fn store_failure(err: StoreError) -> AppError {
    error!(error = %err, "Authentication store failure");
    AppError::internal_server_error()
}
