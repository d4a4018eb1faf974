//! User records and user-facing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Role names understood by the access guard.
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "user";
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Authorization tag checked by role guards, e.g. `admin`
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub role: String,
}

/// Body of the admin user lookup endpoint.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct LookupUserRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_request_validation() {
        let valid = LookupUserRequest {
            email: "admin@example.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = LookupUserRequest {
            email: "not-an-email".to_string(),
        };
        assert!(invalid.validate().is_err());
    }
}
