//! Aadhaar link request domain model
//!
//! The 12-digit Aadhaar number never leaves the request handler: only its
//! SHA-256 digest and a masked form are persisted.

use super::common::{impl_link_record, LinkStatus};
use crate::crypto::sha256_hex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Aadhaar link request entity (aadhaar_db.aadhaar_link_requests)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AadhaarLinkRequest {
    pub request_id: String,
    #[serde(skip_serializing)]
    pub aadhaar_hash: String,
    pub masked_aadhaar: String,
    pub consent_obtained: bool,
    pub status: LinkStatus,
    #[serde(skip_serializing)]
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub otp_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_link_record!(AadhaarLinkRequest);

/// Input for starting an Aadhaar link
#[derive(Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAadhaarLinkInput {
    #[validate(custom(function = "validate_aadhaar_number"))]
    #[schema(example = "123412341234")]
    pub aadhaar_number: String,
    #[serde(default)]
    #[validate(custom(function = "validate_consent"))]
    pub consent_obtained: bool,
}

// Keeps the plaintext number out of logs and error reports
impl std::fmt::Debug for CreateAadhaarLinkInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateAadhaarLinkInput")
            .field("aadhaar_number", &mask_aadhaar(&self.aadhaar_number))
            .field("consent_obtained", &self.consent_obtained)
            .finish()
    }
}

/// What actually gets stored for a new Aadhaar link request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAadhaarLinkRequest {
    pub aadhaar_hash: String,
    pub masked_aadhaar: String,
}

impl From<&CreateAadhaarLinkInput> for NewAadhaarLinkRequest {
    fn from(input: &CreateAadhaarLinkInput) -> Self {
        Self {
            aadhaar_hash: sha256_hex(&input.aadhaar_number),
            masked_aadhaar: mask_aadhaar(&input.aadhaar_number),
        }
    }
}

/// `XXXX-XXXX-` followed by the last four digits
pub fn mask_aadhaar(number: &str) -> String {
    let start = number.len().saturating_sub(4);
    let tail = number.get(start..).unwrap_or_default();
    format!("XXXX-XXXX-{}", tail)
}

fn validate_aadhaar_number(number: &str) -> Result<(), validator::ValidationError> {
    if number.len() == 12 && number.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_aadhaar_format")
            .with_message("aadhaarNumber must be exactly 12 digits".into()))
    }
}

fn validate_consent(consent: &bool) -> Result<(), validator::ValidationError> {
    if *consent {
        Ok(())
    } else {
        Err(validator::ValidationError::new("consent_required")
            .with_message("Explicit user consent is mandatory for Aadhaar linking".into()))
    }
}
