// handlers/auth.rs - POST /api/v1/auth/login, POST /api/v1/auth/register, GET /api/v1/auth/me

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::validate::{email_shape, normalize_email, password_strength, trim, validated, Normalize};
use crate::auth::{IssuedToken, Principal};
use crate::database::models::UserProfile;
use crate::error::ErrorBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        normalize_email(&mut self.email);
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(
        email(message = "must be a valid email address"),
        custom(function = "email_shape")
    )]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(custom(function = "password_strength"))]
    pub password: String,
}

impl Normalize for RegisterRequest {
    fn normalize(&mut self) {
        trim(&mut self.name);
        normalize_email(&mut self.email);
    }
}

/// POST /api/v1/auth/login - exchange credentials for a bearer token
///
/// Only the request shape is validated; an unknown email and a wrong
/// password produce the same 401.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = IssuedToken),
        (status = 400, description = "Malformed request", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<IssuedToken> {
    let body = validated(payload)?;

    let token = state.auth.login(&body.email, &body.password).await?;
    Ok(ApiResponse::with_message(token, "Login successful"))
}

/// POST /api/v1/auth/register - self-service sign-up, always role USER
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created with role USER", body = UserProfile),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let body = validated(payload)?;

    let user = state.auth.register(body.name, body.email, body.password).await?;
    Ok(ApiResponse::created(user.into(), "User registered successfully"))
}

/// GET /api/v1/auth/me - the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(State(state): State<AppState>, Extension(principal): Extension<Principal>) -> ApiResult<UserProfile> {
    let user = state.users.get(principal.id).await?;
    Ok(ApiResponse::success(user.into()))
}
