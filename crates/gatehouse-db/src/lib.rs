//! # Gatehouse DB
//!
//! Database pool setup and the token/user stores used by the authenticator.
//!
//! - [`stores`]: the [`TokenStore`] and [`UserStore`] interfaces
//! - [`postgres`]: sqlx implementations over PostgreSQL
//! - [`memory`]: in-memory implementations for tests
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_db::{init_db_pool, run_migrations, PgTokenStore};
//!
//! let pool = init_db_pool(&config.database).await?;
//! run_migrations(&pool).await?;
//! let tokens = PgTokenStore::new(pool.clone());
//! ```

pub mod memory;
pub mod postgres;
pub mod stores;

use gatehouse_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use memory::{InMemoryTokenStore, InMemoryUserStore};
pub use postgres::{PgTokenStore, PgUserStore};
pub use stores::{StoreError, TokenStore, UserStore};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens the PostgreSQL connection pool described by `config`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies the migrations bundled from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Runs a trivial query to confirm the database answers.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
