//! # Gatehouse Models
//!
//! Domain models shared by the stores, the authenticator and the HTTP layer.
//!
//! - [`tokens`]: issued credentials and their expiry rule
//! - [`users`]: user records, role names and user DTOs

pub mod tokens;
pub mod users;

pub use tokens::{Token, TokenType};
pub use users::{LookupUserRequest, NewUser, User, roles};
