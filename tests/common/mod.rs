#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::{TimeDelta, Utc};
use gatehouse::router::init_router;
use gatehouse::state::AppState;
use gatehouse_auth::TokenIssuer;
use gatehouse_config::{AppConfig, JwtConfig};
use gatehouse_db::{InMemoryTokenStore, InMemoryUserStore, TokenStore, UserStore};
use gatehouse_models::{NewUser, Token, TokenType, User};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const WINDOW: Duration = Duration::from_secs(3600);

pub fn test_config(environment: &str) -> AppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("ENVIRONMENT", environment.to_string()),
        ("DATABASE_URL", "postgres://unused@localhost/unused".to_string()),
        ("JWT_SECRET", JWT_SECRET.to_string()),
        ("TOKEN_EXPIRATION_MS", WINDOW.as_millis().to_string()),
    ]);
    AppConfig::from_lookup(&|key: &str| vars.get(key).cloned()).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub tokens: Arc<InMemoryTokenStore>,
    pub users: Arc<InMemoryUserStore>,
    pub issuer: TokenIssuer,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_environment("test")
    }

    pub fn with_environment(environment: &str) -> Self {
        let config = test_config(environment);
        let tokens = Arc::new(InMemoryTokenStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let state = AppState::with_stores(&config, tokens.clone(), users.clone());

        Self {
            router: init_router(state, None),
            tokens,
            users,
            issuer: TokenIssuer::new(&JwtConfig {
                secret: JWT_SECRET.to_string(),
            }),
        }
    }

    /// Adds a user directly to the store.
    pub async fn add_user(&self, role: &str) -> User {
        self.users
            .insert(NewUser {
                email: format!("{}-{}@example.com", role, Uuid::new_v4().simple()),
                role: role.to_string(),
            })
            .await
            .unwrap()
    }

    /// Issues a token for `user_id` and records it, created `age` ago.
    pub async fn token_for(&self, user_id: Uuid, age: TimeDelta) -> String {
        let token = self.issuer.issue(user_id).unwrap();
        let mut record = Token::new(token.clone(), user_id, TokenType::Auth);
        record.created_at = Utc::now() - age;
        self.tokens.insert(&record).await.unwrap();
        token
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }
}

pub async fn read_json(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}
