use gatehouse_auth::AuthenticatedUser;
use gatehouse_core::ErrorResponse;
use gatehouse_models::{LookupUserRequest, User};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::health::model::{
    ComponentHealth, ComponentState, ComponentStatus, HealthResponse, OverallStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::health::controller::health_ready,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::lookup_user,
    ),
    components(
        schemas(
            AuthenticatedUser,
            User,
            LookupUserRequest,
            ErrorResponse,
            HealthResponse,
            ComponentHealth,
            ComponentStatus,
            ComponentState,
            OverallStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness checks"),
        (name = "Users", description = "Endpoints for any authenticated user"),
        (name = "Admin", description = "Endpoints restricted to the admin role")
    ),
    info(
        title = "Gatehouse API",
        version = "0.1.0",
        description = "Bearer-token authenticated REST API built with Rust, Axum, and PostgreSQL. Every response uses the `{ success, data, error }` envelope.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/health/ready",
            "/api/users/me",
            "/api/admin/users/{id}",
            "/api/admin/users/lookup",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
