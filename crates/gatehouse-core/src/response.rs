//! Response envelope shared by every endpoint.
//!
//! Successful and failed responses use the same shape:
//!
//! ```json
//! { "success": true,  "data": { ... }, "error": null }
//! { "success": false, "data": null,    "error": "Token expired" }
//! ```

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Schema of a failed response, for API documentation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Always `null`
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_serialization() {
        let value = serde_json::to_value(ApiResponse::ok(json!({ "id": 1 }))).unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "data": { "id": 1 }, "error": null })
        );
    }

    #[test]
    fn test_error_serialization() {
        let value = serde_json::to_value(ApiResponse::<()>::error("User not found")).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "data": null, "error": "User not found" })
        );
    }
}
