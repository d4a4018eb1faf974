//! In-memory stores.
//!
//! Used by the test suites and by anything that needs the authenticator
//! without a database. Each store counts its calls and can be switched into
//! an "unavailable" mode where every operation fails, to exercise the
//! authenticator's handling of store outages.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_models::{NewUser, Token, TokenType, User};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::stores::{StoreError, TokenStore, UserStore};

#[derive(Debug, Default)]
struct CallCounter {
    reads: AtomicUsize,
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, Token>>,
    calls: CallCounter,
    unavailable: AtomicBool,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut store = Self::new();
        let map = tokens
            .into_iter()
            .map(|token| (token.token.clone(), token))
            .collect();
        store.tokens = RwLock::new(map);
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.tokens.read().await.contains_key(token)
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Total number of store operations performed.
    pub fn call_count(&self) -> usize {
        self.calls.reads.load(Ordering::SeqCst)
            + self.calls.writes.load(Ordering::SeqCst)
            + self.calls.deletes.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.calls.deletes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("token store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn find_one(
        &self,
        token: &str,
        user_id: Uuid,
        token_type: TokenType,
    ) -> Result<Option<Token>, StoreError> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self
            .tokens
            .read()
            .await
            .get(token)
            .filter(|t| t.user_id == user_id && t.token_type == token_type)
            .cloned())
    }

    async fn insert(&self, token: &Token) -> Result<(), StoreError> {
        self.calls.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(StoreError::Conflict("token already exists".to_string()));
        }
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.tokens.write().await.remove(token);
        Ok(())
    }

    async fn delete_created_before(
        &self,
        token_type: TokenType,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.calls.deletes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| !(t.token_type == token_type && t.created_at < cutoff));
        Ok((before - tokens.len()) as u64)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
    calls: CallCounter,
    unavailable: AtomicBool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let mut store = Self::new();
        store.users = RwLock::new(users.into_iter().map(|u| (u.id, u)).collect());
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.reads.load(Ordering::SeqCst) + self.calls.writes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("user store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.calls.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        self.calls.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict("email already registered".to_string()));
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            role: user.role,
            created_at: Utc::now(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn auth_token(value: &str, user_id: Uuid, age: TimeDelta) -> Token {
        Token {
            token: value.to_string(),
            user_id,
            token_type: TokenType::Auth,
            created_at: Utc::now() - age,
        }
    }

    #[tokio::test]
    async fn test_find_one_requires_all_keys_to_match() {
        let user_id = Uuid::new_v4();
        let store = InMemoryTokenStore::with_tokens([auth_token("abc", user_id, TimeDelta::zero())]);

        assert!(store.find_one("abc", user_id, TokenType::Auth).await.unwrap().is_some());
        assert!(store.find_one("abc", Uuid::new_v4(), TokenType::Auth).await.unwrap().is_none());
        assert!(store.find_one("abc", user_id, TokenType::Refresh).await.unwrap().is_none());
        assert!(store.find_one("xyz", user_id, TokenType::Auth).await.unwrap().is_none());
        assert_eq!(store.call_count(), 4);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let user_id = Uuid::new_v4();
        let store = InMemoryTokenStore::with_tokens([auth_token("abc", user_id, TimeDelta::zero())]);

        store.delete("abc").await.unwrap();
        store.delete("abc").await.unwrap();

        assert!(!store.contains("abc").await);
        assert_eq!(store.delete_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_created_before_only_touches_matching_type() {
        let user_id = Uuid::new_v4();
        let mut stale_refresh = auth_token("refresh", user_id, TimeDelta::hours(5));
        stale_refresh.token_type = TokenType::Refresh;
        let store = InMemoryTokenStore::with_tokens([
            auth_token("stale", user_id, TimeDelta::hours(2)),
            auth_token("fresh", user_id, TimeDelta::minutes(1)),
            stale_refresh,
        ]);

        let removed = store
            .delete_created_before(TokenType::Auth, Utc::now() - TimeDelta::hours(1))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(!store.contains("stale").await);
        assert!(store.contains("fresh").await);
        assert!(store.contains("refresh").await);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = InMemoryTokenStore::new();
        store.set_unavailable(true);
        let err = store.delete("abc").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_user_insert_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        let user = store
            .insert(NewUser {
                email: "Admin@Example.com".to_string(),
                role: "admin".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(store.find_by_id(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            store.find_by_email("admin@example.com").await.unwrap(),
            Some(user)
        );

        let err = store
            .insert(NewUser {
                email: "admin@example.com".to_string(),
                role: "user".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
