use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::auth::{Access, Role, RoutePolicy};
use crate::handlers::{auth, products, system, users};
use crate::middleware::access_control;
use crate::openapi::{self, API_DOCS_ROUTES};
use crate::state::AppState;

pub const ROOT: &str = "/";
pub const HEALTH: &str = "/health";
pub const LOGIN: &str = "/api/v1/auth/login";
pub const REGISTER: &str = "/api/v1/auth/register";
pub const ME: &str = "/api/v1/auth/me";
pub const PRODUCTS: &str = "/api/v1/products";
pub const PRODUCT: &str = "/api/v1/products/:id";
pub const USERS: &str = "/api/v1/users";
pub const USER: &str = "/api/v1/users/:id";

/// Access rules for every route the router serves.
pub fn default_policy() -> RoutePolicy {
    let admin = || Access::roles([Role::Admin]);

    let policy = API_DOCS_ROUTES
        .into_iter()
        .fold(RoutePolicy::new(), |policy, route| policy.rule(Method::GET, route, Access::Public));

    policy
        .rule(Method::GET, ROOT, Access::Public)
        .rule(Method::GET, HEALTH, Access::Public)
        .rule(Method::POST, LOGIN, Access::Public)
        .rule(Method::POST, REGISTER, Access::Public)
        .rule(Method::GET, ME, Access::Authenticated)
        .rule(Method::GET, PRODUCTS, Access::Public)
        .rule(Method::GET, PRODUCT, Access::Public)
        .rule(Method::POST, PRODUCTS, admin())
        .rule(Method::PATCH, PRODUCT, admin())
        .rule(Method::DELETE, PRODUCT, admin())
        .rule(Method::GET, USERS, Access::Authenticated)
        .rule(Method::GET, USER, Access::Authenticated)
        .rule(Method::POST, USERS, admin())
        .rule(Method::PATCH, USER, admin())
        .rule(Method::DELETE, USER, admin())
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state);

    let router = Router::new()
        .route(ROOT, get(system::root))
        .route(HEALTH, get(system::health))
        .route(LOGIN, post(auth::login))
        .route(REGISTER, post(auth::register))
        .route(ME, get(auth::me))
        .route(PRODUCTS, get(products::list).post(products::create))
        .route(
            PRODUCT,
            get(products::get).patch(products::update).delete(products::delete),
        )
        .route(USERS, get(users::list).post(users::create))
        .route(USER, get(users::get).patch(users::update).delete(users::delete))
        .merge(openapi::swagger_ui())
        // route_layer: unmatched paths 404 without touching auth
        .route_layer(middleware::from_fn_with_state(state.clone(), access_control))
        .with_state(state);

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(body_limit)),
    )
}

fn cors_layer(state: &AppState) -> Option<CorsLayer> {
    let security = &state.config.security;
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE]),
    )
}

/// Serve on an already-bound listener until ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Catalog API listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::in_memory(AppConfig::development(), default_policy()).unwrap();
        router(state)
    }

    #[test]
    fn mutating_routes_are_admin_only() {
        let policy = default_policy();
        for (method, route) in [
            (Method::POST, PRODUCTS),
            (Method::PATCH, PRODUCT),
            (Method::DELETE, PRODUCT),
            (Method::POST, USERS),
            (Method::PATCH, USER),
            (Method::DELETE, USER),
        ] {
            assert_eq!(policy.access_for(&method, route), Access::roles([Role::Admin]));
        }
    }

    #[test]
    fn unlisted_route_requires_authentication() {
        let policy = default_policy();
        assert_eq!(policy.access_for(&Method::PUT, PRODUCT), Access::Authenticated);
    }

    #[tokio::test]
    async fn public_listing_needs_no_token() {
        let response = app()
            .oneshot(Request::get(PRODUCTS).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn admin_route_without_token_is_unauthorized() {
        let response = app()
            .oneshot(
                Request::post(PRODUCTS)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"x","price":1,"category":"c"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn api_docs_are_public() {
        let policy = default_policy();
        for route in API_DOCS_ROUTES {
            assert_eq!(policy.access_for(&Method::GET, route), Access::Public);
        }
    }

    #[tokio::test]
    async fn openapi_document_needs_no_token() {
        let response = app()
            .oneshot(Request::get(openapi::API_DOCS_JSON).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn swagger_ui_needs_no_token() {
        let response = app()
            .oneshot(Request::get("/api-docs/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = app()
            .oneshot(Request::get("/api/v1/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
