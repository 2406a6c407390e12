//! PAN link request domain model

use super::common::{impl_link_record, LinkStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// PAN link request entity (pan_db.pan_link_requests)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PanLinkRequest {
    pub request_id: String,
    pub pan_number: String,
    pub customer_name: String,
    pub status: LinkStatus,
    #[serde(skip_serializing)]
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub otp_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_link_record!(PanLinkRequest);

impl PanLinkRequest {
    /// `******` followed by the last four characters of the PAN
    pub fn masked_pan(&self) -> String {
        mask_pan(&self.pan_number)
    }
}

pub fn mask_pan(pan: &str) -> String {
    let tail: String = pan
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("******{}", tail)
}

/// Input for starting a PAN link
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePanLinkInput {
    #[validate(custom(function = "validate_pan_number"))]
    #[schema(example = "ABCDE1234F")]
    pub pan_number: String,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    #[schema(example = "Test User")]
    pub customer_name: String,
}

fn validate_pan_number(pan: &str) -> Result<(), validator::ValidationError> {
    if PAN_REGEX.is_match(pan) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_pan_format")
            .with_message("panNumber must be 5 letters, 4 digits, 1 letter".into()))
    }
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

// Regex for PAN validation
lazy_static::lazy_static! {
    pub static ref PAN_REGEX: regex::Regex = regex::Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").unwrap();
}
