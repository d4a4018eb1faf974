//! Store interfaces consumed by the authenticator.
//!
//! Implementations are injected as `Arc<dyn TokenStore>` / `Arc<dyn UserStore>`:
//! [`crate::postgres`] for production, [`crate::memory`] for tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_models::{NewUser, Token, TokenType, User};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Finds the record matching all three of token string, owner and type.
    async fn find_one(
        &self,
        token: &str,
        user_id: Uuid,
        token_type: TokenType,
    ) -> Result<Option<Token>, StoreError>;

    async fn insert(&self, token: &Token) -> Result<(), StoreError>;

    /// Deletes the record if present. Deleting an absent token succeeds.
    async fn delete(&self, token: &str) -> Result<(), StoreError>;

    /// Deletes every token of `token_type` created strictly before `cutoff`,
    /// returning how many were removed.
    async fn delete_created_before(
        &self,
        token_type: TokenType,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}
