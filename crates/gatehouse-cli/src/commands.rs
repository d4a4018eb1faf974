use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use gatehouse_auth::TokenIssuer;
use gatehouse_db::{StoreError, TokenStore, UserStore};
use gatehouse_models::{NewUser, Token, TokenType, User};
use tracing::info;
use validator::ValidateEmail;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("role must not be empty")]
    EmptyRole,

    #[error("no user with email {0}")]
    UserNotFound(String),

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("expiration window is out of range")]
    WindowOutOfRange,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Inserts a user. Fails with a store conflict if the email is taken.
pub async fn create_user(
    users: &dyn UserStore,
    email: &str,
    role: &str,
) -> Result<User, CliError> {
    let email = email.trim();
    if !email.validate_email() {
        return Err(CliError::InvalidEmail(email.to_string()));
    }

    let role = role.trim();
    if role.is_empty() {
        return Err(CliError::EmptyRole);
    }

    let user = users
        .insert(NewUser {
            email: email.to_string(),
            role: role.to_string(),
        })
        .await?;

    info!(user_id = %user.id, role = %user.role, "User created");
    Ok(user)
}

/// Signs a new token for the user and records it as an auth token.
pub async fn issue_token(
    users: &dyn UserStore,
    tokens: &dyn TokenStore,
    issuer: &TokenIssuer,
    email: &str,
) -> Result<String, CliError> {
    let user = users
        .find_by_email(email.trim())
        .await?
        .ok_or_else(|| CliError::UserNotFound(email.trim().to_string()))?;

    let token = issuer
        .issue(user.id)
        .map_err(|e| CliError::Signing(e.to_string()))?;

    tokens
        .insert(&Token::new(token.clone(), user.id, TokenType::Auth))
        .await?;

    info!(user_id = %user.id, "Token issued");
    Ok(token)
}

/// Deletes every auth token already past its window at `now`.
pub async fn purge_expired(
    tokens: &dyn TokenStore,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<u64, CliError> {
    let cutoff = TimeDelta::from_std(window)
        .ok()
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or(CliError::WindowOutOfRange)?;

    let deleted = tokens
        .delete_created_before(TokenType::Auth, cutoff)
        .await?;

    info!(deleted, %cutoff, "Purged expired tokens");
    Ok(deleted)
}
