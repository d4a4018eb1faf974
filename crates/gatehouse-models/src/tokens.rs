//! Issued credentials.
//!
//! A [`Token`] row is the server-side half of a bearer token: the opaque
//! string handed to the client, the user it was issued to, what it may be
//! used for, and when it was created. Rows are never updated; an expired
//! row is deleted the first time it is presented.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Auth,
    Refresh,
    ResetPassword,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Auth => "auth",
            TokenType::Refresh => "refresh",
            TokenType::ResetPassword => "reset_password",
        }
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(TokenType::Auth),
            "refresh" => Ok(TokenType::Refresh),
            "reset_password" => Ok(TokenType::ResetPassword),
            other => Err(format!("unknown token type: {other}")),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    pub user_id: Uuid,
    pub token_type: TokenType,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(token: impl Into<String>, user_id: Uuid, token_type: TokenType) -> Self {
        Self {
            token: token.into(),
            user_id,
            token_type,
            created_at: Utc::now(),
        }
    }

    /// Last instant at which the token is still accepted.
    pub fn expires_at(&self, window: Duration) -> DateTime<Utc> {
        TimeDelta::from_std(window)
            .ok()
            .and_then(|delta| self.created_at.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// A token is valid up to and including `created_at + window`.
    pub fn is_expired_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now > self.expires_at(window)
    }
}
