//! # Gatehouse Core
//!
//! Core types shared by every Gatehouse crate:
//!
//! - [`errors`]: the [`AppError`] type and its single HTTP mapping
//! - [`response`]: the `{ success, data, error }` response envelope
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_core::{ApiResponse, AppError};
//!
//! async fn handler() -> Result<ApiResponse<String>, AppError> {
//!     Err(AppError::not_found("User not found"))
//! }
//! ```

pub mod errors;
pub mod response;

pub use errors::{
    AppError, ErrorKind, ErrorReport, INTERNAL_ERROR_MESSAGE, MALFORMED_INPUT_MESSAGE,
};
pub use response::{ApiResponse, ErrorResponse};
