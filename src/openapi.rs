//! OpenAPI document and Swagger UI.
//!
//! Swagger UI is served under [`API_DOCS`], the raw document at
//! [`API_DOCS_JSON`]. Both are public routes. New endpoints need a
//! `#[utoipa::path]` on the handler and an entry in `paths(...)` below.

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{IssuedToken, Role};
use crate::database::models::{Product, UserProfile};
use crate::error::ErrorBody;
use crate::handlers::auth::{LoginRequest, RegisterRequest};
use crate::handlers::products::{CreateProductRequest, UpdateProductRequest};
use crate::handlers::users::{CreateUserRequest, UpdateUserRequest};

pub const API_DOCS: &str = "/api-docs";
pub const API_DOCS_JSON: &str = "/api-docs-json";

/// Route patterns the Swagger UI router registers.
pub const API_DOCS_ROUTES: [&str; 4] = ["/api-docs", "/api-docs/", "/api-docs/*rest", API_DOCS_JSON];

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        description = "Product catalog with JWT authentication and role-based access control.

Protected endpoints expect `Authorization: Bearer <token>` from `POST /api/v1/auth/login`."
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "system", description = "Service identity and health"),
        (name = "auth", description = "Login, registration and the current user"),
        (name = "products", description = "Product catalog; writes are ADMIN only"),
        (name = "users", description = "User accounts; writes are ADMIN only")
    ),
    components(schemas(
        ErrorBody,
        Role,
        IssuedToken,
        UserProfile,
        Product,
        LoginRequest,
        RegisterRequest,
        CreateProductRequest,
        UpdateProductRequest,
        CreateUserRequest,
        UpdateUserRequest,
    )),
    paths(
        crate::handlers::system::root,
        crate::handlers::system::health,
        crate::handlers::auth::login,
        crate::handlers::auth::register,
        crate::handlers::auth::me,
        crate::handlers::products::list,
        crate::handlers::products::get,
        crate::handlers::products::create,
        crate::handlers::products::update,
        crate::handlers::products::delete,
        crate::handlers::users::list,
        crate::handlers::users::get,
        crate::handlers::users::create,
        crate::handlers::users::update,
        crate::handlers::users::delete,
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

pub fn swagger_ui<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new(API_DOCS).url(API_DOCS_JSON, ApiDoc::openapi()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = json["paths"].as_object().unwrap();
        for path in [
            "/",
            "/health",
            "/api/v1/auth/login",
            "/api/v1/auth/register",
            "/api/v1/auth/me",
            "/api/v1/products",
            "/api/v1/products/{id}",
            "/api/v1/users",
            "/api/v1/users/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(paths["/api/v1/products/{id}"]["patch"].is_object());
    }

    #[test]
    fn document_declares_bearer_scheme_and_schemas() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(json["components"]["securitySchemes"]["bearer"]["scheme"], "bearer");
        for schema in ["ErrorBody", "Product", "UserProfile", "IssuedToken", "CreateUserRequest"] {
            assert!(json["components"]["schemas"][schema].is_object(), "missing {}", schema);
        }
    }

    #[test]
    fn swagger_router_builds() {
        let _router: Router<()> = swagger_ui();
    }
}
