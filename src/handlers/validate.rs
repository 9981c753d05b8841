// handlers/validate.rs - request body and path validation shared by handlers

use std::borrow::Borrow;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::Json;
use validator::{Validate, ValidationError};

use crate::auth::password::validate_password_strength;
use crate::auth::Role;
use crate::error::ApiError;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge("Request body is too large".to_string());
        }
        ApiError::invalid_json(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Parse a `:id` path segment; ids are positive integers.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::invalid_field("id", format!("'{}' is not a positive integer", raw)))
}

/// Canonical form of a request body, applied before its `Validate` rules run.
pub trait Normalize {
    fn normalize(&mut self);
}

/// Unwrap a JSON body, normalize it and run its validation rules.
pub fn validated<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError>
where
    T: Validate + Normalize,
{
    let Json(mut body) = payload?;
    body.normalize();
    body.validate()?;
    Ok(body)
}

pub fn trim(value: &mut String) {
    *value = value.trim().to_string();
}

pub fn normalize_email(value: &mut String) {
    *value = value.trim().to_lowercase();
}

/// Stricter than `#[validate(email)]`: a dot-atom local part and a dotted domain.
pub fn email_shape(email: &str) -> Result<(), ValidationError> {
    let valid = match email.rsplit_once('@') {
        Some((local, domain)) => {
            !local.starts_with('.') && !local.ends_with('.') && !local.contains("..") && domain.contains('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("must be a valid email address".into()))
    }
}

pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password)
        .map_err(|problem| ValidationError::new("password").with_message(problem.into()))
}

pub fn non_negative_price<T: Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    let value = value.borrow();
    if value.is_finite() && *value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("price").with_message("must be a non-negative number".into()))
    }
}

pub fn known_role(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Role>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("role").with_message("must be ADMIN or USER".into()))
}

/// Role from an already-validated field.
pub fn parse_role(value: &str) -> Result<Role, ApiError> {
    value
        .parse::<Role>()
        .map_err(|_| ApiError::invalid_field("role", "must be ADMIN or USER"))
}

pub fn no_changes() -> ValidationError {
    ValidationError::new("empty_update").with_message("at least one field must be provided".into())
}
