//! Token lifetime configuration.
//!
//! The expiration window is measured from the moment a token record was
//! created. It has no default: an unset, non-numeric or zero
//! `TOKEN_EXPIRATION_MS` is a startup error.

use std::time::Duration;

use crate::ConfigError;
use crate::source::required;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(token_expiration: Duration) -> Self {
        Self { token_expiration }
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = required(lookup, "TOKEN_EXPIRATION_MS")?;
        let millis: u64 = raw.parse().map_err(|_| {
            ConfigError::invalid("TOKEN_EXPIRATION_MS", "must be a whole number of milliseconds")
        })?;

        if millis == 0 {
            return Err(ConfigError::invalid(
                "TOKEN_EXPIRATION_MS",
                "must be greater than zero",
            ));
        }

        Ok(Self::new(Duration::from_millis(millis)))
    }
}
