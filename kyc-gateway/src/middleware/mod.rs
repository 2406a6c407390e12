//! HTTP middleware for the KYC gateway
//!
//! - Bearer token enforcement on `/v1/**` and the `AuthUser` extractor
//! - Request id propagation and HTTP metrics
//! - Sanitized trace spans
//! - JSON normalization of error bodies

pub mod auth;
pub mod error_response;
pub mod metrics;
pub mod require_auth;
pub mod trace;

pub use auth::AuthUser;
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use require_auth::{require_auth_middleware, AuthMiddlewareState};
pub use trace::SanitizedMakeSpan;
