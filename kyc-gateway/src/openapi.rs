//! OpenAPI 3.0 documentation assembly
//!
//! Aggregates the handler path annotations and request/response schemas
//! into one document, served at `/api-docs/openapi.json` outside production.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KYC Verification Gateway API",
        version = "0.1.0",
        description = "PAN and Aadhaar link requests and KYC onboarding sessions"
    ),
    tags(
        (name = "System", description = "Health checks and development login"),
        (name = "PAN", description = "PAN link request lifecycle"),
        (name = "Aadhaar", description = "Aadhaar link request lifecycle"),
        (name = "KYC", description = "KYC onboarding sessions and documents"),
    ),
    security(
        ("bearer_jwt" = [])
    ),
    components(
        schemas(
            // ── Shared ─────────────────────────────────────────────────
            crate::domain::LinkStatus,
            crate::api::LinkActionResponse,
            crate::api::VerifyOtpInput,

            // ── PAN ────────────────────────────────────────────────────
            crate::domain::CreatePanLinkInput,
            crate::api::PanStatusResponse,

            // ── Aadhaar ────────────────────────────────────────────────
            crate::domain::CreateAadhaarLinkInput,
            crate::api::AadhaarStatusResponse,

            // ── KYC ────────────────────────────────────────────────────
            crate::domain::CreateSessionInput,
            crate::domain::AddDocumentInput,
            crate::domain::DocumentType,
            crate::domain::DocumentSide,
            crate::api::SessionCreatedResponse,
            crate::api::DocumentCreatedResponse,
            crate::api::DocumentSummary,
            crate::api::SessionSummaryResponse,

            // ── System ─────────────────────────────────────────────────
            crate::api::health::HealthResponse,
            crate::api::auth::LoginResponse,
        ),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,
        crate::api::auth::login,

        crate::api::pan::start,
        crate::api::pan::send_otp,
        crate::api::pan::verify_otp,
        crate::api::pan::finalize,
        crate::api::pan::status,

        crate::api::aadhaar::start,
        crate::api::aadhaar::send_otp,
        crate::api::aadhaar::verify_otp,
        crate::api::aadhaar::finalize,
        crate::api::aadhaar::status,

        crate::api::kyc::create_session,
        crate::api::kyc::add_document,
        crate::api::kyc::summary,
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Build the document with the bearer JWT security scheme attached
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_jwt".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
        doc
    }
}
