//! KYC onboarding session and document models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub const SESSION_STATUS_CREATED: &str = "CREATED";
pub const DOCUMENT_STATE_UPLOADED: &str = "UPLOADED";

/// Only Indian jurisdiction is onboarded
pub const SUPPORTED_JURISDICTION: &str = "IN";

/// KYC session entity (kyc_db.kyc_sessions)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KycSession {
    pub id: String,
    pub kyc_purpose: String,
    pub jurisdiction: String,
    #[sqlx(json)]
    pub customer: Map<String, Value>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// KYC document entity (kyc_db.kyc_documents)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KycDocument {
    pub id: String,
    pub session_id: String,
    pub document_type: String,
    pub side: String,
    pub country: String,
    pub state: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Pan,
    Aadhaar,
    Passport,
    VoterId,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Pan => "PAN",
            DocumentType::Aadhaar => "AADHAAR",
            DocumentType::Passport => "PASSPORT",
            DocumentType::VoterId => "VOTER_ID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentSide {
    Front,
    Back,
}

impl DocumentSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSide::Front => "FRONT",
            DocumentSide::Back => "BACK",
        }
    }
}

/// Input for opening a KYC session
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    #[validate(length(min = 1, max = 100), custom(function = "super::pan::validate_not_blank"))]
    #[schema(example = "ACCOUNT_OPENING")]
    pub kyc_purpose: String,
    #[validate(custom(function = "validate_jurisdiction"))]
    #[schema(example = "IN")]
    pub jurisdiction: String,
    #[schema(value_type = Object)]
    pub customer: Map<String, Value>,
}

/// Input for attaching a document to a session
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentInput {
    pub document_type: DocumentType,
    pub side: DocumentSide,
    #[validate(length(min = 1, max = 50), custom(function = "super::pan::validate_not_blank"))]
    #[schema(example = "IN")]
    pub country: String,
}

fn validate_jurisdiction(value: &str) -> Result<(), validator::ValidationError> {
    if value == SUPPORTED_JURISDICTION {
        Ok(())
    } else {
        Err(validator::ValidationError::new("unsupported_jurisdiction")
            .with_message("jurisdiction must be IN".into()))
    }
}

/// Session with its documents in upload order
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session: KycSession,
    pub documents: Vec<KycDocument>,
}
