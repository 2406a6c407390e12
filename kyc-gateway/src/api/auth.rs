//! Development token issuer

use crate::error::{AppError, Result};
use crate::state::HasServices;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subject of tokens issued by `/login`
pub const DEV_LOGIN_SUBJECT: &str = "admin";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Issue an access token for local development and load testing.
///
/// Disabled (404) unless `DEV_LOGIN_ENABLED` is set, which is the default
/// outside production.
#[utoipa::path(
    post,
    path = "/login",
    tag = "System",
    security(()),
    responses(
        (status = 200, description = "Access token issued", body = LoginResponse),
        (status = 404, description = "Development login disabled")
    )
)]
pub async fn login<S: HasServices>(State(state): State<S>) -> Result<Json<LoginResponse>> {
    if !state.config().jwt.dev_login_enabled {
        return Err(AppError::NotFound("Not found".to_string()));
    }

    let access_token = state
        .jwt_manager()
        .create_access_token(DEV_LOGIN_SUBJECT)?;
    tracing::warn!(subject = DEV_LOGIN_SUBJECT, "Issued development access token");

    Ok(Json(LoginResponse { access_token }))
}
