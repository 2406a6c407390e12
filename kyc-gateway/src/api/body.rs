//! Request body decoding for JSON and url-encoded form payloads
//!
//! Link-request and document bodies are decoded according to `Content-Type`.
//! Some clients label a JSON body as `application/x-www-form-urlencoded`;
//! with `lenient_content_type` enabled such bodies are decoded as JSON and a
//! warning is logged.

use crate::error::AppError;
use crate::state::HasServices;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

/// Largest body accepted by [`RequestBody`]
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Body of a `POST` accepted as JSON or as a url-encoded form
#[derive(Debug, Clone)]
pub struct RequestBody<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(content_type: Option<&str>) -> BodyKind {
    let Some(value) = content_type else {
        return BodyKind::Other;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
    {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

/// True when the first non-whitespace byte opens a JSON object
pub(crate) fn looks_like_json_object(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}

async fn read_body(body: Body) -> Result<Bytes, AppError> {
    to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {}", e)))
}

fn json_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => AppError::BadRequest(e.body_text()),
        other => AppError::BadRequest(other.body_text()),
    }
}

impl<S, T> FromRequest<S> for RequestBody<T>
where
    S: HasServices,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match body_kind(content_type.as_deref()) {
            BodyKind::Json => {
                let bytes = read_body(req.into_body()).await?;
                let Json(value) = Json::<T>::from_bytes(&bytes).map_err(json_error)?;
                Ok(RequestBody(value))
            }
            BodyKind::Form => {
                let (parts, body) = req.into_parts();
                let bytes = read_body(body).await?;

                if state.config().lenient_content_type && looks_like_json_object(&bytes) {
                    tracing::warn!(
                        path = %parts.uri.path(),
                        "JSON body sent with form content type, decoding as JSON"
                    );
                    let Json(value) = Json::<T>::from_bytes(&bytes).map_err(json_error)?;
                    return Ok(RequestBody(value));
                }

                let req = Request::from_parts(parts, Body::from(bytes));
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                Ok(RequestBody(value))
            }
            BodyKind::Other => Err(AppError::UnsupportedMediaType(format!(
                "Expected application/json or application/x-www-form-urlencoded, got {}",
                content_type.as_deref().unwrap_or("no content type")
            ))),
        }
    }
}
