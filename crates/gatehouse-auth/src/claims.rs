//! JWT claim structure for bearer tokens.

use serde::{Deserialize, Serialize};

/// Claims carried by a bearer token.
///
/// Tokens are not self-expiring: their lifetime is enforced server-side from
/// the token record's creation time. `exp` is honoured when present but the
/// issuer does not set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// Issued-at (Unix timestamp)
    pub iat: usize,
    /// Optional expiration (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
    /// Unique token identifier, so two tokens issued in the same second differ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}
