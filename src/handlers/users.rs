// handlers/users.rs - /api/v1/users and /api/v1/users/:id
//
// Responses always go through UserProfile so no hash leaves the service.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::validate::{
    email_shape, known_role, no_changes, normalize_email, parse_id, parse_role, password_strength, trim, validated,
    Normalize,
};
use crate::database::models::UserProfile;
use crate::error::{ApiError, ErrorBody};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CreateUser, UpdateUser};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(custom(function = "known_role"))]
    #[schema(example = "USER")]
    pub role: String,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
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

impl Normalize for CreateUserRequest {
    fn normalize(&mut self) {
        trim(&mut self.role);
        trim(&mut self.name);
        normalize_email(&mut self.email);
    }
}

impl CreateUserRequest {
    pub fn into_input(self) -> Result<CreateUser, ApiError> {
        Ok(CreateUser {
            role: parse_role(&self.role)?,
            name: self.name,
            email: self.email,
            password: self.password,
        })
    }
}

/// Partial update; at least one field must be present.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "has_user_changes"))]
pub struct UpdateUserRequest {
    #[validate(custom(function = "known_role"))]
    pub role: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(
        email(message = "must be a valid email address"),
        custom(function = "email_shape")
    )]
    pub email: Option<String>,
    #[validate(custom(function = "password_strength"))]
    pub password: Option<String>,
}

impl Normalize for UpdateUserRequest {
    fn normalize(&mut self) {
        for field in [&mut self.role, &mut self.name].into_iter().flatten() {
            trim(field);
        }
        if let Some(email) = &mut self.email {
            normalize_email(email);
        }
    }
}

impl UpdateUserRequest {
    fn into_input(self) -> Result<UpdateUser, ApiError> {
        Ok(UpdateUser {
            role: self.role.as_deref().map(parse_role).transpose()?,
            name: self.name,
            email: self.email,
            password: self.password,
        })
    }
}

fn has_user_changes(request: &UpdateUserRequest) -> Result<(), ValidationError> {
    let unchanged =
        request.role.is_none() && request.name.is_none() && request.email.is_none() && request.password.is_none();
    if unchanged {
        Err(no_changes())
    } else {
        Ok(())
    }
}

/// GET /api/v1/users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "All users", body = Vec<UserProfile>),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserProfile>> {
    let users = state.users.list().await?;
    let users = users.into_iter().map(UserProfile::from).collect();
    Ok(ApiResponse::with_message(users, "Users retrieved successfully"))
}

/// GET /api/v1/users/:id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserProfile> {
    let id = parse_id(&id)?;
    let user = state.users.get(id).await?;
    Ok(ApiResponse::success(user.into()))
}

/// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Caller is not ADMIN", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let input = validated(payload)?.into_input()?;

    let user = state.users.create(input).await?;
    Ok(ApiResponse::created(user.into(), "User created successfully"))
}

/// PATCH /api/v1/users/:id - a new password is hashed before storage
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserProfile),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Caller is not ADMIN", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let id = parse_id(&id)?;
    let input = validated(payload)?.into_input()?;

    let user = state.users.update(id, input).await?;
    Ok(ApiResponse::with_message(user.into(), "User updated successfully"))
}

/// DELETE /api/v1/users/:id - returns the removed user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = UserProfile),
        (status = 403, description = "Caller is not ADMIN", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<UserProfile> {
    let id = parse_id(&id)?;
    let user = state.users.delete(id).await?;
    Ok(ApiResponse::with_message(user.into(), "User deleted successfully"))
}
