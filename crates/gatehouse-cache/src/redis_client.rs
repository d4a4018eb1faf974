//! Redis client with a managed, auto-reconnecting connection.
//!
//! The connection is opened lazily. A failed attempt is not remembered, so
//! the next [`RedisClient::ping`] tries again.

use std::sync::Arc;
use std::time::Duration;

use redis::{Client, aio::ConnectionManager};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// How long a health ping may take before Redis is reported down.
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on opening the managed connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
    conn: Arc<Mutex<Option<ConnectionManager>>>,
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient").finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Redis did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Unexpected PING reply: {0}")]
    UnexpectedReply(String),
}

impl RedisClient {
    /// Parses `redis_url` (e.g. `redis://localhost:6379`) without connecting.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if the URL is invalid.
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: Client::open(redis_url)?,
            conn: Arc::new(Mutex::new(None)),
        })
    }

    /// Returns the managed connection, opening it first if needed.
    ///
    /// # Errors
    ///
    /// `CacheError::Timeout` when the server does not accept the connection
    /// within [`CONNECT_TIMEOUT`], `CacheError::Connection` when it refuses.
    pub async fn connect(&self) -> Result<ConnectionManager, CacheError> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(self.client.clone()))
            .await
            .map_err(|_| CacheError::Timeout(CONNECT_TIMEOUT))??;

        info!("Redis connection established");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Sends `PING` and expects `PONG`.
    #[instrument(skip(self), fields(cache.operation = "PING"))]
    pub async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connect().await?;

        let ping = async move {
            let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(reply)
        };

        let reply = tokio::time::timeout(PING_TIMEOUT, ping)
            .await
            .map_err(|_| CacheError::Timeout(PING_TIMEOUT))?
            .inspect_err(|e| error!(error = %e, "Redis PING error"))?;

        if reply != "PONG" {
            return Err(CacheError::UnexpectedReply(reply));
        }

        debug!("Redis PING ok");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = RedisClient::new("not a redis url").unwrap_err();
        assert!(matches!(err, CacheError::Connection(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_within_bound() {
        let client = RedisClient::new("redis://127.0.0.1:1").unwrap();

        let outcome = tokio::time::timeout(CONNECT_TIMEOUT * 3, client.ping()).await;

        assert!(matches!(outcome, Ok(Err(_))));
        assert!(!client.is_connected().await);
    }

    #[tokio::test]
    async fn test_failed_connect_is_retried() {
        let client = RedisClient::new("redis://127.0.0.1:1").unwrap();

        assert!(client.connect().await.is_err());
        assert!(!client.is_connected().await);

        let retry = tokio::time::timeout(CONNECT_TIMEOUT * 3, client.connect()).await;
        assert!(matches!(retry, Ok(Err(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = CacheError::UnexpectedReply("NOPE".to_string());
        assert_eq!(err.to_string(), "Unexpected PING reply: NOPE");

        let err = CacheError::Timeout(PING_TIMEOUT);
        assert!(err.to_string().contains("2s"));
    }
}
