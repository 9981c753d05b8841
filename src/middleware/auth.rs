use axum::{
    extract::{MatchedPath, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::auth::{authorize, AuthError, Decision, TokenError};
use crate::error::ApiError;
use crate::services::ServiceError;
use crate::state::AppState;

/// Per-request access pipeline: route policy, authentication, authorization,
/// then dispatch.
///
/// Applied with `Router::route_layer`, so only matched routes reach it and
/// the route pattern is available. Protected handlers find the
/// [`Principal`](crate::auth::Principal) in the request extensions.
pub async fn access_control(
    State(state): State<AppState>,
    matched: MatchedPath,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let route = matched.as_str();

    let required = match state.policy.access_for(&method, route).required_roles() {
        Some(required) => required,
        None => return Ok(next.run(request).await),
    };

    let token = match bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(kind) => {
            warn!("{} {} rejected: {}", method, route, kind);
            return Err(AuthError::InvalidToken(kind).into());
        }
    };

    let principal = match state.auth.authenticate(&token).await {
        Ok(principal) => principal,
        Err(ServiceError::Auth(AuthError::InvalidToken(kind))) => {
            warn!("{} {} rejected: {}", method, route, kind);
            return Err(AuthError::InvalidToken(kind).into());
        }
        Err(ServiceError::Auth(AuthError::PrincipalNotFound(id))) => {
            warn!("{} {} rejected: token names unknown user {}", method, route, id);
            return Err(AuthError::PrincipalNotFound(id).into());
        }
        Err(e) => return Err(e.into()),
    };

    if let Decision::Deny(reason) = authorize(&principal, &required) {
        info!(
            "{} {} denied for user {} ({}): {:?}",
            method, route, principal.id, principal.role, reason
        );
        return Err(AuthError::InsufficientRole.into());
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme name is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let value = headers.get(AUTHORIZATION).ok_or(TokenError::Missing)?;
    let value = value.to_str().map_err(|_| TokenError::Malformed)?.trim();

    let (scheme, token) = value.split_once(char::is_whitespace).unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(TokenError::Malformed);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Missing);
    }
    Ok(token)
}
