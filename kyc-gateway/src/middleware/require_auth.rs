//! Authentication enforcement middleware for `/v1/**`
//!
//! Validates the Bearer token in the Authorization header, rejects requests
//! without a valid access token, and stores the verified claims in the
//! request extensions for [`AuthUser`](super::auth::AuthUser).

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::auth::{extract_bearer_token, AuthError};
use crate::jwt::JwtManager;

/// Shared state for authentication middleware
#[derive(Clone)]
pub struct AuthMiddlewareState {
    jwt_manager: JwtManager,
}

impl AuthMiddlewareState {
    pub fn new(jwt_manager: JwtManager) -> Self {
        Self { jwt_manager }
    }
}

pub async fn require_auth_middleware(
    State(auth_state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Ok(token) => token,
        Err(AuthError::MissingToken) => {
            return unauthorized_response("Missing authorization token");
        }
        Err(_) => {
            return unauthorized_response("Authorization header must use Bearer scheme");
        }
    };

    let claims = match auth_state.jwt_manager.verify_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return unauthorized_response("Invalid or expired token");
        }
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Generate a 401 Unauthorized response
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message,
            "code": "UNAUTHORIZED"
        })),
    )
        .into_response()
}
