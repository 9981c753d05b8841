// handlers/system.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::error::{ApiError, ErrorBody};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - service identity and endpoint map
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service name, version and endpoint map")),
    tag = "system"
)]
pub async fn root() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Ok(ApiResponse::success(json!({
        "name": "Catalog API",
        "version": version,
        "description": "Product catalog with JWT authentication and role-based access control",
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/v1/auth/login, /api/v1/auth/register (public), /api/v1/auth/me (authenticated)",
            "products": "/api/v1/products[/:id] (read public, write ADMIN)",
            "users": "/api/v1/users[/:id] (read authenticated, write ADMIN)",
            "docs": "/api-docs (public)",
        }
    })))
}

/// GET /health - liveness plus database connectivity
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and store are reachable"),
        (status = 503, description = "Database unavailable", body = ErrorBody)
    ),
    tag = "system"
)]
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    let database = match &state.database {
        Some(db) => match db.health_check().await {
            Ok(()) => "ok",
            Err(e) => {
                tracing::error!("Health check failed: {}", e);
                return Err(ApiError::service_unavailable("Database unavailable"));
            }
        },
        None => "memory",
    };

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": now,
        "database": database,
    })))
}
