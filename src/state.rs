use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use gatehouse_auth::{Authenticator, TokenVerifier};
use gatehouse_cache::RedisClient;
use gatehouse_config::{AppConfig, CorsConfig, Environment};
use gatehouse_db::{PgPool, PgTokenStore, PgUserStore, TokenStore, UserStore};
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub environment: Environment,
    pub authenticator: Authenticator,
    pub users: Arc<dyn UserStore>,
    /// `None` when the state was built without a database, e.g. in tests.
    pub db: Option<PgPool>,
    /// `None` when `REDIS_URL` is unset. The client reconnects on its own.
    pub redis: Option<RedisClient>,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// Builds a state around arbitrary stores, with no database or Redis
    /// attached. Readiness then reports both as `not_configured`.
    pub fn with_stores(
        config: &AppConfig,
        tokens: Arc<dyn TokenStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        let authenticator = Authenticator::new(
            TokenVerifier::new(&config.jwt),
            tokens,
            users.clone(),
            config.auth.token_expiration,
        );

        Self {
            environment: config.environment,
            authenticator,
            users,
            db: None,
            redis: None,
            cors_config: config.cors.clone(),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("environment", &self.environment)
            .field("authenticator", &self.authenticator)
            .field("db", &self.db.is_some())
            .field("redis", &self.redis.is_some())
            .finish_non_exhaustive()
    }
}

pub async fn init_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = gatehouse_db::init_db_pool(&config.database)
        .await
        .context("failed to connect to the database")?;
    gatehouse_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let redis = match config.redis.url.as_deref() {
        None => None,
        Some(url) => {
            let client = RedisClient::new(url).context("invalid REDIS_URL")?;
            if let Err(e) = client.connect().await {
                warn!(error = %e, "Redis unavailable at startup, will retry on readiness checks");
            }
            Some(client)
        }
    };

    let mut state = AppState::with_stores(
        config,
        Arc::new(PgTokenStore::new(pool.clone())),
        Arc::new(PgUserStore::new(pool.clone())),
    );
    state.db = Some(pool);
    state.redis = redis;

    Ok(state)
}
