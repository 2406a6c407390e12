//! PAN link request API handlers

use crate::api::{LinkActionResponse, PanStatusResponse, RequestBody, VerifyOtpInput};
use crate::domain::{format_timestamp, CreatePanLinkInput};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

pub const START_MESSAGE: &str = "Linking request initiated. Please send OTP.";
pub const OTP_SENT_MESSAGE: &str = "OTP has been sent to registered mobile number";
pub const OTP_VERIFIED_MESSAGE: &str = "OTP verified successfully";
pub const LINKED_MESSAGE: &str = "PAN has been successfully linked to the account";

/// Start a PAN link request
#[utoipa::path(
    post,
    path = "/v1/pan/link-requests",
    tag = "PAN",
    request_body = CreatePanLinkInput,
    responses(
        (status = 201, description = "Link request created", body = LinkActionResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 415, description = "Unsupported content type"),
        (status = 422, description = "Invalid PAN or customer name")
    )
)]
pub async fn start<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    RequestBody(input): RequestBody<CreatePanLinkInput>,
) -> Result<impl IntoResponse> {
    let request = state.pan_service().start(input).await?;
    tracing::info!(
        request_id = %request.request_id,
        caller = %auth.subject,
        "PAN link request started"
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

/// Send (or resend) the OTP for a PAN link request
#[utoipa::path(
    post,
    path = "/v1/pan/link-requests/{request_id}/send-otp",
    tag = "PAN",
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
    let request = state.pan_service().send_otp(&request_id).await?;
    Ok(Json(LinkActionResponse::new(
        request.request_id,
        request.status,
        OTP_SENT_MESSAGE,
    )))
}

/// Verify the OTP of a PAN link request
#[utoipa::path(
    post,
    path = "/v1/pan/link-requests/{request_id}/verify-otp",
    tag = "PAN",
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
        .pan_service()
        .verify_otp(&request_id, &input.otp)
        .await?;
    Ok(Json(LinkActionResponse::new(
        request.request_id,
        request.status,
        OTP_VERIFIED_MESSAGE,
    )))
}

/// Link a verified PAN to the account
#[utoipa::path(
    post,
    path = "/v1/pan/link-requests/{request_id}/finalize",
    tag = "PAN",
    params(("request_id" = String, Path, description = "Link request ID")),
    responses(
        (status = 200, description = "PAN linked", body = LinkActionResponse),
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
    let request = state.pan_service().finalize(&request_id).await?;
    tracing::info!(
        request_id = %request.request_id,
        caller = %auth.subject,
        "PAN linked"
    );

    Ok(Json(LinkActionResponse::new(
        request.request_id,
        request.status,
        LINKED_MESSAGE,
    )))
}

/// Current state of a PAN link request
#[utoipa::path(
    get,
    path = "/v1/pan/link-requests/{request_id}",
    tag = "PAN",
    params(("request_id" = String, Path, description = "Link request ID")),
    responses(
        (status = 200, description = "Link request state", body = PanStatusResponse),
        (status = 404, description = "Unknown link request")
    )
)]
pub async fn status<S: HasServices>(
    State(state): State<S>,
    Path(request_id): Path<String>,
) -> Result<Json<PanStatusResponse>> {
    let request = state.pan_service().status(&request_id).await?;
    Ok(Json(PanStatusResponse {
        pan_number: request.masked_pan(),
        updated_at: format_timestamp(&request.updated_at),
        request_id: request.request_id,
        status: request.status,
    }))
}
