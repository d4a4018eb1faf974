//! Middleware modules for request processing.
//!
//! - [`auth`]: bearer-token authentication layer and the [`AuthUser`](auth::AuthUser) extractor
//! - [`role`]: role guard for routes that need specific roles
//! - [`error`]: logs failed requests and shapes internal error bodies
//!
//! # Request Flow
//!
//! 1. `require_auth` resolves the `Authorization` header to a user and
//!    attaches it to the request
//! 2. `require_roles` checks that user's role against the route's guard
//! 3. The handler runs, reading the user through `AuthUser`
//! 4. `handle_errors` logs any failure on the way out
//!
//! Route layers run in reverse order of registration, so the auth layer is
//! added last:
//!
//! ```ignore
//! Router::new()
//!     .route("/users/{id}", get(get_user))
//!     .route_layer(middleware::from_fn_with_state(RoleGuard::new(["admin"]), require_roles))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

pub mod auth;
pub mod error;
pub mod role;
