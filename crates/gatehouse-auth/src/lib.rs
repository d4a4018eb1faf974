//! # Gatehouse Auth
//!
//! Bearer-token authentication for the Gatehouse API.
//!
//! - [`claims`]: JWT claim structure
//! - [`jwt`]: [`TokenIssuer`] and [`TokenVerifier`]
//! - [`authenticator`]: the [`Authenticator`] that turns an `Authorization`
//!   header into an [`AuthenticatedUser`], consulting the token and user
//!   stores and deleting expired token records
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gatehouse_auth::{Authenticator, TokenVerifier};
//! use gatehouse_db::{PgTokenStore, PgUserStore};
//!
//! let authenticator = Authenticator::new(
//!     TokenVerifier::new(&config.jwt),
//!     Arc::new(PgTokenStore::new(pool.clone())),
//!     Arc::new(PgUserStore::new(pool.clone())),
//!     config.auth.token_expiration,
//! );
//!
//! let user = authenticator.authenticate(Some("Bearer eyJ...")).await?;
//! ```

pub mod authenticator;
pub mod claims;
pub mod jwt;

pub use authenticator::{
    AuthenticatedUser, Authenticator, INVALID_TOKEN, TOKEN_EXPIRED, TOKEN_NOT_PROVIDED,
    USER_NOT_FOUND, bearer_token,
};
pub use claims::Claims;
pub use jwt::{TokenIssuer, TokenVerifier, VerifiedToken};
