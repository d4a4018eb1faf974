use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use gatehouse_auth::{AuthenticatedUser, INVALID_TOKEN};
use gatehouse_core::AppError;
use gatehouse_observability::{track_auth_failure, track_auth_success};

use crate::state::AppState;

/// Extractor for the authenticated caller.
///
/// Reads the user attached by [`require_auth`]. On routes without that
/// layer it authenticates the request itself.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(AuthUser(user.clone()));
        }

        let user = authenticate(state, &parts.headers).await?;
        parts.extensions.insert(user.clone());
        Ok(AuthUser(user))
    }
}

/// Rejects the request unless it carries a live bearer token for an
/// existing user, then attaches that user to the request extensions.
///
/// ```rust,ignore
/// Router::new()
///     .route("/me", get(get_me))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AppError> {
    let result = match authorization_header(headers) {
        Ok(header) => state.authenticator.authenticate(header).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(user) => track_auth_success(&user.role),
        Err(e) => track_auth_failure(&e.resolve(false).1),
    }

    result
}

/// A header that is present but not valid UTF-8 cannot hold a token.
fn authorization_header(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::unauthorized(INVALID_TOKEN))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_authorization_header_absent() {
        let headers = HeaderMap::new();
        assert!(matches!(authorization_header(&headers), Ok(None)));
    }

    #[test]
    fn test_authorization_header_present() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert!(matches!(authorization_header(&headers), Ok(Some("Bearer abc"))));
    }

    #[test]
    fn test_authorization_header_not_utf8() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        let err = authorization_header(&headers).unwrap_err();
        assert_eq!(err.resolve(false).1, INVALID_TOKEN);
    }
}
