//! PostgreSQL-backed stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_models::{NewUser, Token, TokenType, User};
use sqlx::{FromRow, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::stores::{StoreError, TokenStore, UserStore};

#[derive(FromRow)]
struct TokenRow {
    token: String,
    user_id: Uuid,
    token_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TokenRow> for Token {
    type Error = StoreError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        Ok(Token {
            token_type: row.token_type.parse().map_err(StoreError::Corrupt)?,
            token: row.token,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    #[instrument(skip(self, token))]
    async fn find_one(
        &self,
        token: &str,
        user_id: Uuid,
        token_type: TokenType,
    ) -> Result<Option<Token>, StoreError> {
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            SELECT token, user_id, token_type, created_at
            FROM tokens
            WHERE token = $1 AND user_id = $2 AND token_type = $3
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(token_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Token::try_from).transpose()
    }

    #[instrument(skip(self, token), fields(user_id = %token.user_id))]
    async fn insert(&self, token: &Token) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tokens (token, user_id, token_type, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.token_type.as_str())
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation("token already exists"))?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Token already deleted");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_created_before(
        &self,
        token_type: TokenType,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tokens WHERE token_type = $1 AND created_at < $2")
            .bind(token_type.as_str())
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, role, created_at FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, role)
            VALUES ($1, $2)
            RETURNING id, email, role, created_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation("email already registered"))?;

        Ok(created)
    }
}

fn map_unique_violation(message: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Database(err),
    }
}
