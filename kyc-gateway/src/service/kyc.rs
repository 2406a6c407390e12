//! KYC onboarding service

use crate::domain::{
    AddDocumentInput, CreateSessionInput, KycDocument, KycSession, SessionSummary,
};
use crate::error::{AppError, Result};
use crate::repository::KycRepository;
use std::sync::Arc;
use validator::Validate;

pub struct KycService<R: KycRepository> {
    repo: Arc<R>,
}

impl<R: KycRepository> KycService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create_session(&self, input: CreateSessionInput) -> Result<KycSession> {
        input.validate()?;
        let session = self.repo.create_session(&input).await?;
        tracing::info!(session_id = %session.id, purpose = %session.kyc_purpose, "KYC session created");
        Ok(session)
    }

    pub async fn add_document(
        &self,
        session_id: &str,
        input: AddDocumentInput,
    ) -> Result<KycDocument> {
        input.validate()?;
        self.require_session(session_id).await?;
        self.repo.add_document(session_id, &input).await
    }

    pub async fn summary(&self, session_id: &str) -> Result<SessionSummary> {
        let session = self.require_session(session_id).await?;
        let documents = self.repo.list_documents(session_id).await?;
        Ok(SessionSummary { session, documents })
    }

    async fn require_session(&self, session_id: &str) -> Result<KycSession> {
        self.repo
            .find_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("KYC session {} not found", session_id)))
    }
}
