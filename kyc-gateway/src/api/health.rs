//! Health check endpoints

use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    security(()),
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint: every domain database must answer
#[utoipa::path(
    get,
    path = "/ready",
    tag = "System",
    security(()),
    responses(
        (status = 200, description = "All databases reachable"),
        (status = 503, description = "A database is unreachable")
    )
)]
pub async fn ready<S: HasServices>(State(state): State<S>) -> impl IntoResponse {
    if state.check_ready().await {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    }
}
