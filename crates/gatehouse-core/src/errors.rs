//! Application error type and its HTTP mapping.
//!
//! Every failure raised by an extractor, middleware or handler is an
//! [`AppError`]. It is rendered exactly once, by [`IntoResponse`], into the
//! standard `{ success, data, error }` envelope. The rendered response also
//! carries an [`ErrorReport`] extension so the error-handling middleware can
//! log the failure with the request's method and path, and can re-render
//! internal failures with their details in development.

use std::fmt;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::response::ApiResponse;

/// Message returned for request bodies that are not syntactically valid JSON.
pub const MALFORMED_INPUT_MESSAGE: &str = "Malformed request body";

/// Message returned for unexpected failures outside of development.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum AppError {
    /// A failure that already knows its HTTP status and user-facing message.
    Status { status: StatusCode, message: String },
    /// The request body could not be parsed at all.
    MalformedInput(String),
    /// Field-level validation failures, one message per violation.
    Validation(Vec<String>),
    /// Anything else. Details are only exposed in development.
    Internal(Error),
}

/// Coarse classification used in logs and in the [`ErrorReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Status,
    MalformedInput,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Status => "status",
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::Validation => "validation",
            ErrorKind::Internal => "internal",
        }
    }
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// A 500 whose message never reveals the underlying cause.
    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::Internal(err.into())
    }

    pub fn malformed_input(detail: impl Into<String>) -> Self {
        Self::MalformedInput(detail.into())
    }

    pub fn validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation(messages.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Status { .. } => ErrorKind::Status,
            AppError::MalformedInput(_) => ErrorKind::MalformedInput,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.resolve(false).0
    }

    /// Maps the error to the status code and message sent to the client.
    ///
    /// `expose_details` only affects [`AppError::Internal`], whose full error
    /// chain replaces the generic message when set.
    pub fn resolve(&self, expose_details: bool) -> (StatusCode, String) {
        match self {
            AppError::Status { status, message } => (*status, message.clone()),
            AppError::MalformedInput(_) => {
                (StatusCode::BAD_REQUEST, MALFORMED_INPUT_MESSAGE.to_string())
            }
            AppError::Validation(messages) => (StatusCode::BAD_REQUEST, messages.join(", ")),
            AppError::Internal(err) if expose_details => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:?}"))
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
        }
    }

    pub fn report(&self) -> ErrorReport {
        let (status, message) = self.resolve(false);
        ErrorReport {
            status,
            kind: self.kind(),
            message,
            detailed_message: self.resolve(true).1,
            cause: self.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Status { status, message } => write!(f, "{status}: {message}"),
            AppError::MalformedInput(detail) => write!(f, "malformed input: {detail}"),
            AppError::Validation(messages) => {
                write!(f, "validation failed: {}", messages.join(", "))
            }
            AppError::Internal(err) => write!(f, "{err:#}"),
        }
    }
}

/// Snapshot of a rendered error, attached to the response extensions.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub kind: ErrorKind,
    /// Message sent to the client outside of development.
    pub message: String,
    /// Message sent to the client in development.
    pub detailed_message: String,
    /// Full description for logs.
    pub cause: String,
}

impl ErrorReport {
    /// Builds the response body for this error.
    pub fn render(&self, expose_details: bool) -> Response {
        let message = if expose_details {
            self.detailed_message.clone()
        } else {
            self.message.clone()
        };

        let mut response = (self.status, Json(ApiResponse::<()>::error(message))).into_response();
        response.extensions_mut().insert(self.clone());
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report().render(false)
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_error_keeps_status_and_message() {
        let err = AppError::unauthorized("Token expired");
        assert_eq!(
            err.resolve(false),
            (StatusCode::UNAUTHORIZED, "Token expired".to_string())
        );
        assert_eq!(err.kind(), ErrorKind::Status);
    }

    #[test]
    fn test_validation_messages_joined() {
        let err = AppError::validation(["a required", "b required"]);
        assert_eq!(
            err.resolve(false),
            (StatusCode::BAD_REQUEST, "a required, b required".to_string())
        );
    }

    #[test]
    fn test_malformed_input_uses_fixed_message() {
        let err = AppError::malformed_input("expected value at line 1 column 1");
        let (status, message) = err.resolve(true);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, MALFORMED_INPUT_MESSAGE);
    }

    #[test]
    fn test_internal_hides_details_unless_exposed() {
        let err = AppError::internal(anyhow!("connection refused"));
        assert_eq!(
            err.resolve(false),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string()
            )
        );
        let (_, detailed) = err.resolve(true);
        assert!(detailed.contains("connection refused"));
    }

    #[test]
    fn test_internal_server_error_is_masked_status() {
        let err = AppError::internal_server_error();
        assert_eq!(err.kind(), ErrorKind::Status);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let (_, detailed) = err.resolve(true);
        assert_eq!(detailed, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_from_io_error_is_internal() {
        let io = std::io::Error::other("disk full");
        let err: AppError = io.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_into_response_envelope() {
        let response = AppError::forbidden("Forbidden").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.extensions().get::<ErrorReport>().is_some());

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "Forbidden");
    }

    #[tokio::test]
    async fn test_report_render_with_details() {
        let report = AppError::internal(anyhow!("pool timed out")).report();
        let body = body_json(report.render(true)).await;
        assert!(body["error"].as_str().unwrap().contains("pool timed out"));

        let body = body_json(report.render(false)).await;
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    }
}
