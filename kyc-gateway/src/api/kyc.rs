//! KYC onboarding session API handlers

use crate::api::{DocumentCreatedResponse, RequestBody, SessionCreatedResponse, SessionSummaryResponse};
use crate::domain::{AddDocumentInput, CreateSessionInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// Open a KYC onboarding session
#[utoipa::path(
    post,
    path = "/v1/kyc/sessions",
    tag = "KYC",
    request_body = CreateSessionInput,
    responses(
        (status = 201, description = "Session created", body = SessionCreatedResponse),
        (status = 422, description = "Invalid session input")
    )
)]
pub async fn create_session<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    RequestBody(input): RequestBody<CreateSessionInput>,
) -> Result<impl IntoResponse> {
    let session = state.kyc_service().create_session(input).await?;
    tracing::debug!(session_id = %session.id, caller = %auth.subject, "KYC session opened");

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id,
            status: session.status,
        }),
    ))
}

/// Attach a document to a session
#[utoipa::path(
    post,
    path = "/v1/kyc/sessions/{session_id}/documents",
    tag = "KYC",
    params(("session_id" = String, Path, description = "KYC session ID")),
    request_body = AddDocumentInput,
    responses(
        (status = 201, description = "Document recorded", body = DocumentCreatedResponse),
        (status = 404, description = "Unknown session"),
        (status = 422, description = "Invalid document input")
    )
)]
pub async fn add_document<S: HasServices>(
    State(state): State<S>,
    Path(session_id): Path<String>,
    RequestBody(input): RequestBody<AddDocumentInput>,
) -> Result<impl IntoResponse> {
    let document = state.kyc_service().add_document(&session_id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(DocumentCreatedResponse {
            document_id: document.id,
            status: document.state,
        }),
    ))
}

/// Session state with its documents in upload order
#[utoipa::path(
    get,
    path = "/v1/kyc/sessions/{session_id}/summary",
    tag = "KYC",
    params(("session_id" = String, Path, description = "KYC session ID")),
    responses(
        (status = 200, description = "Session summary", body = SessionSummaryResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn summary<S: HasServices>(
    State(state): State<S>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSummaryResponse>> {
    let summary = state.kyc_service().summary(&session_id).await?;
    Ok(Json(summary.into()))
}
