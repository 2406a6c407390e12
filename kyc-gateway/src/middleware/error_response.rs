//! Error response normalization middleware
//!
//! Every 4xx/5xx leaving the gateway carries a `{"error", "message"}` JSON
//! body, including framework responses such as 405 and timeouts.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Replace non-JSON error bodies with the standard JSON error shape
pub async fn normalize_error_response(request: Request<Body>, next: Next) -> Response {
    let uri = request.uri().path().to_string();
    let response = next.run(request).await;

    let status = response.status();

    // Probes answer in plain text
    if uri == "/health" || uri == "/ready" {
        return response;
    }

    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") {
        return response;
    }

    generic_error_response(status)
}

fn generic_error_response(status: StatusCode) -> Response {
    let error_type = match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
        StatusCode::REQUEST_TIMEOUT => "timeout",
        StatusCode::CONFLICT => "conflict",
        StatusCode::PAYLOAD_TOO_LARGE => "payload_too_large",
        StatusCode::UNPROCESSABLE_ENTITY => "validation",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "unsupported_media_type",
        _ if status.is_client_error() => "client_error",
        _ => "internal_error",
    };

    let message = match status {
        StatusCode::BAD_REQUEST => "Invalid request body",
        StatusCode::UNAUTHORIZED => "Authentication required",
        StatusCode::FORBIDDEN => "Access denied",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        StatusCode::CONFLICT => "Resource conflict",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        StatusCode::UNPROCESSABLE_ENTITY => "Validation error",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported content type",
        _ if status.is_client_error() => "Client error",
        _ => "An internal error occurred",
    };

    let body = json!({
        "error": error_type,
        "message": message,
    });

    (status, axum::Json(body)).into_response()
}
