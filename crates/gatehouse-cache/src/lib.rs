//! # Gatehouse Cache
//!
//! Redis connection management. The API does not cache anything in Redis
//! yet; the client is used by the readiness check to report whether the
//! Redis deployment is reachable.

pub mod redis_client;

pub use redis_client::{CONNECT_TIMEOUT, CacheError, PING_TIMEOUT, RedisClient};
