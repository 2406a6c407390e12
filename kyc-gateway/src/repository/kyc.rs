//! KYC session and document repository (kyc_db)

use crate::domain::{
    generate_id, AddDocumentInput, CreateSessionInput, KycDocument, KycSession,
    DOCUMENT_STATE_UPLOADED, SESSION_STATUS_CREATED,
};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KycRepository: Send + Sync + 'static {
    async fn create_session(&self, input: &CreateSessionInput) -> Result<KycSession>;
    async fn find_session(&self, session_id: &str) -> Result<Option<KycSession>>;
    async fn add_document(&self, session_id: &str, input: &AddDocumentInput)
        -> Result<KycDocument>;
    /// Documents of a session in upload order
    async fn list_documents(&self, session_id: &str) -> Result<Vec<KycDocument>>;
}

pub struct KycRepositoryImpl {
    pool: PgPool,
}

impl KycRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KycRepository for KycRepositoryImpl {
    async fn create_session(&self, input: &CreateSessionInput) -> Result<KycSession> {
        let id = generate_id("sess_");

        let session = sqlx::query_as::<_, KycSession>(
            r#"
            INSERT INTO kyc_sessions (id, kyc_purpose, jurisdiction, customer, status, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, kyc_purpose, jurisdiction, customer, status, created_at
            "#,
        )
        .bind(&id)
        .bind(input.kyc_purpose.trim())
        .bind(&input.jurisdiction)
        .bind(Json(&input.customer))
        .bind(SESSION_STATUS_CREATED)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<KycSession>> {
        let session = sqlx::query_as::<_, KycSession>(
            r#"
            SELECT id, kyc_purpose, jurisdiction, customer, status, created_at
            FROM kyc_sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn add_document(
        &self,
        session_id: &str,
        input: &AddDocumentInput,
    ) -> Result<KycDocument> {
        let id = generate_id("doc_");

        let document = sqlx::query_as::<_, KycDocument>(
            r#"
            INSERT INTO kyc_documents (id, session_id, document_type, side, country, state, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, session_id, document_type, side, country, state, uploaded_at
            "#,
        )
        .bind(&id)
        .bind(session_id)
        .bind(input.document_type.as_str())
        .bind(input.side.as_str())
        .bind(input.country.trim())
        .bind(DOCUMENT_STATE_UPLOADED)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    async fn list_documents(&self, session_id: &str) -> Result<Vec<KycDocument>> {
        let documents = sqlx::query_as::<_, KycDocument>(
            r#"
            SELECT id, session_id, document_type, side, country, state, uploaded_at
            FROM kyc_documents
            WHERE session_id = $1
            ORDER BY seq
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }
}
