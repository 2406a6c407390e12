//! REST API handlers and shared response types

pub mod aadhaar;
pub mod auth;
pub mod body;
pub mod docs;
pub mod health;
pub mod kyc;
pub mod metrics;
pub mod pan;

pub use body::RequestBody;

use crate::domain::{KycDocument, LinkStatus, SessionSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response of a link request state transition
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkActionResponse {
    pub request_id: String,
    pub status: LinkStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked_aadhaar: Option<String>,
}

impl LinkActionResponse {
    pub fn new(request_id: impl Into<String>, status: LinkStatus, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status,
            message: message.into(),
            masked_aadhaar: None,
        }
    }

    pub fn with_masked_aadhaar(mut self, masked: impl Into<String>) -> Self {
        self.masked_aadhaar = Some(masked.into());
        self
    }
}

/// OTP submitted for verification
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct VerifyOtpInput {
    pub otp: String,
}

/// Current state of a PAN link request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PanStatusResponse {
    pub request_id: String,
    pub status: LinkStatus,
    /// Masked PAN (`******` + last four characters). Snake case on the wire,
    /// as existing status consumers read it.
    #[serde(rename = "pan_number")]
    pub pan_number: String,
    /// RFC 3339, UTC
    pub updated_at: String,
}

/// Current state of an Aadhaar link request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AadhaarStatusResponse {
    pub request_id: String,
    pub status: LinkStatus,
    pub masked_aadhaar: String,
    /// RFC 3339, UTC
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreatedResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreatedResponse {
    pub document_id: String,
    pub status: String,
}

/// Document entry of a session summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub document_type: String,
    pub status: String,
}

impl From<KycDocument> for DocumentSummary {
    fn from(doc: KycDocument) -> Self {
        Self {
            id: doc.id,
            document_type: doc.document_type,
            status: doc.state,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryResponse {
    pub session_id: String,
    pub status: String,
    pub document_count: usize,
    pub documents: Vec<DocumentSummary>,
}

impl From<SessionSummary> for SessionSummaryResponse {
    fn from(summary: SessionSummary) -> Self {
        Self {
            session_id: summary.session.id,
            status: summary.session.status,
            document_count: summary.documents.len(),
            documents: summary.documents.into_iter().map(Into::into).collect(),
        }
    }
}
