//! # Gatehouse CLI
//!
//! Administrative commands that work directly against the stores, used by
//! the `gatehouse-cli` binary.
//!
//! ## Usage
//!
//! ```ignore
//! use gatehouse_cli::commands::{create_user, issue_token};
//!
//! let user = create_user(&users, "admin@example.com", "admin").await?;
//! let token = issue_token(&users, &tokens, &issuer, "admin@example.com").await?;
//! ```

pub mod commands;

pub use commands::CliError;
