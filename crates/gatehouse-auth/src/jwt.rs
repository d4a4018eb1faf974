//! Signing and verification of bearer tokens.
//!
//! Tokens are HS256 JWTs whose subject is the user's UUID. Verification is
//! total: any malformed, tampered or foreign token yields `None`, never an
//! error, so callers only have to decide what "not verified" means for them.
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_auth::{TokenIssuer, TokenVerifier};
//!
//! let issuer = TokenIssuer::new(&config.jwt);
//! let token = issuer.issue(user_id)?;
//!
//! let verifier = TokenVerifier::new(&config.jwt);
//! let verified = verifier.verify(&token).expect("freshly issued");
//! assert_eq!(verified.id, user_id);
//! ```

use std::collections::HashSet;
use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use gatehouse_config::JwtConfig;
use gatehouse_core::AppError;

use crate::claims::Claims;

/// A token whose signature checked out, with its subject parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub id: Uuid,
    pub claims: Claims,
}

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::from(["sub".to_string()]);

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Checks signature and shape, returning the claimed user id.
    pub fn verify(&self, token: &str) -> Option<VerifiedToken> {
        let data = decode::<Claims>(token, &self.key, &self.validation).ok()?;
        let id = Uuid::parse_str(&data.claims.sub).ok()?;

        Some(VerifiedToken {
            id,
            claims: data.claims,
        })
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Signs a new token for `user_id`.
    ///
    /// The token string is also the key of its server-side record, so every
    /// call produces a distinct value.
    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: Utc::now().timestamp() as usize,
            exp: None,
            jti: Some(Uuid::new_v4().to_string()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.key).map_err(AppError::internal)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}
