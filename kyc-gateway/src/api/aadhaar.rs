//! Aadhaar link request API handlers

use crate::api::{AadhaarStatusResponse, LinkActionResponse, RequestBody, VerifyOtpInput};
use crate::domain::{format_timestamp, CreateAadhaarLinkInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub const START_MESSAGE: &str = "Aadhaar linking initiated. Consent verified.";
pub const OTP_SENT_MESSAGE: &str = "OTP successfully triggered via UIDAI gateway";
pub const OTP_VERIFIED_MESSAGE: &str = "UIDAI OTP validation successful";
pub const LINKED_MESSAGE: &str = "Aadhaar successfully linked to the primary account.";

/// Start an Aadhaar link request; requires the holder's consent
#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests",
    tag = "Aadhaar",
    request_body = CreateAadhaarLinkInput,
    responses(
        (status = 201, description = "Link request created", body = LinkActionResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 415, description = "Unsupported content type"),
        (status = 422, description = "Invalid number or consent missing")
    )
)]
pub async fn start<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    RequestBody(input): RequestBody<CreateAadhaarLinkInput>,
) -> Result<impl IntoResponse> {
    let request = state.aadhaar_service().start(input).await?;
    tracing::info!(
        request_id = %request.request_id,
        masked_aadhaar = %request.masked_aadhaar,
        caller = %auth.subject,
        "Aadhaar link request started"
    );

    Ok((
        StatusCode::CREATED,
        Json(LinkActionResponse::new(
            request.request_id,
            request.status,
            START_MESSAGE,
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests/{request_id}/send-otp",
    tag = "Aadhaar",
    params(("request_id" = String, Path, description = "Link request ID")),
    responses(
        (status = 200, description = "OTP sent", body = LinkActionResponse),
        (status = 404, description = "Unknown link request"),
        (status = 409, description = "Request already verified or linked")
    )
)]
pub async fn send_otp<S: HasServices>(
    State(state): State<S>,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse> {
    let request = state.aadhaar_service().send_otp(&request_id).await?;
    Ok(Json(LinkActionResponse::new(
        request.request_id,
        request.status,
        OTP_SENT_MESSAGE,
    )))
}

#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests/{request_id}/verify-otp",
    tag = "Aadhaar",
    params(("request_id" = String, Path, description = "Link request ID")),
    request_body = VerifyOtpInput,
    responses(
        (status = 200, description = "OTP verified", body = LinkActionResponse),
        (status = 400, description = "Wrong or expired OTP"),
        (status = 403, description = "Too many failed attempts"),
        (status = 404, description = "Unknown link request"),
        (status = 409, description = "No OTP outstanding"),
        (status = 422, description = "OTP is not six digits")
    )
)]
pub async fn verify_otp<S: HasServices>(
    State(state): State<S>,
    Path(request_id): Path<String>,
    RequestBody(input): RequestBody<VerifyOtpInput>,
) -> Result<impl IntoResponse> {
    let request = state
        .aadhaar_service()
        .verify_otp(&request_id, &input.otp)
        .await?;
    Ok(Json(LinkActionResponse::new(
        request.request_id,
        request.status,
        OTP_VERIFIED_MESSAGE,
    )))
}

/// Link a verified Aadhaar number; the response carries the masked number
#[utoipa::path(
    post,
    path = "/v1/aadhaar/link-requests/{request_id}/finalize",
    tag = "Aadhaar",
    params(("request_id" = String, Path, description = "Link request ID")),
    responses(
        (status = 200, description = "Aadhaar linked", body = LinkActionResponse),
        (status = 400, description = "OTP not verified yet"),
        (status = 404, description = "Unknown link request"),
        (status = 409, description = "Already linked")
    )
)]
pub async fn finalize<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse> {
    let request = state.aadhaar_service().finalize(&request_id).await?;
    tracing::info!(
        request_id = %request.request_id,
        caller = %auth.subject,
        "Aadhaar linked"
    );

    Ok(Json(
        LinkActionResponse::new(request.request_id, request.status, LINKED_MESSAGE)
            .with_masked_aadhaar(request.masked_aadhaar),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/aadhaar/link-requests/{request_id}",
    tag = "Aadhaar",
    params(("request_id" = String, Path, description = "Link request ID")),
    responses(
        (status = 200, description = "Link request state", body = AadhaarStatusResponse),
        (status = 404, description = "Unknown link request")
    )
)]
pub async fn status<S: HasServices>(
    State(state): State<S>,
    Path(request_id): Path<String>,
) -> Result<Json<AadhaarStatusResponse>> {
    let request = state.aadhaar_service().status(&request_id).await?;
    Ok(Json(AadhaarStatusResponse {
        updated_at: format_timestamp(&request.updated_at),
        request_id: request.request_id,
        status: request.status,
        masked_aadhaar: request.masked_aadhaar,
    }))
}
