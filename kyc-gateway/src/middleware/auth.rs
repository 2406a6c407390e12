//! Bearer token parsing and the `AuthUser` extractor

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::jwt::AccessClaims;
use crate::state::HasServices;

/// Caller identity taken from a verified access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// The token's `sub` claim
    pub subject: String,
    /// Expiration (Unix timestamp)
    pub expires_at: i64,
}

impl From<AccessClaims> for AuthUser {
    fn from(claims: AccessClaims) -> Self {
        Self {
            subject: claims.sub,
            expires_at: claims.exp,
        }
    }
}

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader(String),
    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidHeader(_) => "Invalid authorization header",
            AuthError::InvalidToken(_) => "Invalid or expired token",
        };

        let body = serde_json::json!({
            "error": message,
            "code": "UNAUTHORIZED"
        });

        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Extract the Bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Invalid header encoding".to_string()))?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err(AuthError::MissingToken),
        None => Err(AuthError::InvalidHeader(
            "Authorization header must use Bearer scheme".to_string(),
        )),
    }
}

/// Axum extractor for authenticated callers.
///
/// Behind `require_auth_middleware` the claims are already in the request
/// extensions; elsewhere the token is verified here.
impl<S> FromRequestParts<S> for AuthUser
where
    S: HasServices + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<AccessClaims>() {
            return Ok(AuthUser::from(claims.clone()));
        }

        let token = extract_bearer_token(&parts.headers)?;
        state
            .jwt_manager()
            .verify_access_token(token)
            .map(AuthUser::from)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
