//! Aadhaar link request repository (aadhaar_db)

use super::link::{LinkRequestRepository, LinkTable};
use crate::domain::{
    generate_id, AadhaarLinkRequest, LinkDomain, LinkStatus, NewAadhaarLinkRequest,
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const AADHAAR_TABLE: LinkTable = LinkTable {
    table: "aadhaar_link_requests",
    columns: "request_id, aadhaar_hash, masked_aadhaar, consent_obtained, status, otp_hash, \
              otp_expires_at, otp_attempts, created_at, updated_at",
};

/// Link request storage for the Aadhaar domain
pub trait AadhaarLinkRequestRepository:
    LinkRequestRepository<Record = AadhaarLinkRequest, NewRecord = NewAadhaarLinkRequest>
{
}

impl<T> AadhaarLinkRequestRepository for T where
    T: LinkRequestRepository<Record = AadhaarLinkRequest, NewRecord = NewAadhaarLinkRequest>
{
}

pub struct AadhaarLinkRequestRepositoryImpl {
    pool: PgPool,
}

impl AadhaarLinkRequestRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRequestRepository for AadhaarLinkRequestRepositoryImpl {
    type Record = AadhaarLinkRequest;
    type NewRecord = NewAadhaarLinkRequest;

    async fn create(&self, input: &NewAadhaarLinkRequest) -> Result<AadhaarLinkRequest> {
        let request_id = generate_id(LinkDomain::Aadhaar.id_prefix());

        let record = sqlx::query_as::<_, AadhaarLinkRequest>(
            r#"
            INSERT INTO aadhaar_link_requests
                (request_id, aadhaar_hash, masked_aadhaar, consent_obtained, status,
                 otp_attempts, created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, $4, 0, NOW(), NOW())
            RETURNING request_id, aadhaar_hash, masked_aadhaar, consent_obtained, status, otp_hash,
                      otp_expires_at, otp_attempts, created_at, updated_at
            "#,
        )
        .bind(&request_id)
        .bind(&input.aadhaar_hash)
        .bind(&input.masked_aadhaar)
        .bind(LinkStatus::PendingOtp.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, request_id: &str) -> Result<Option<AadhaarLinkRequest>> {
        AADHAAR_TABLE.find_by_id(&self.pool, request_id).await
    }

    async fn store_otp(
        &self,
        request_id: &str,
        otp_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<AadhaarLinkRequest>> {
        AADHAAR_TABLE
            .store_otp(&self.pool, request_id, otp_hash, expires_at)
            .await
    }

    async fn record_failed_attempt(
        &self,
        request_id: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>> {
        AADHAAR_TABLE
            .record_failed_attempt(&self.pool, request_id, max_attempts)
            .await
    }

    async fn mark_verified(
        &self,
        request_id: &str,
        otp_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<AadhaarLinkRequest>> {
        AADHAAR_TABLE
            .mark_verified(&self.pool, request_id, otp_hash, max_attempts)
            .await
    }

    async fn mark_linked(&self, request_id: &str) -> Result<Option<AadhaarLinkRequest>> {
        AADHAAR_TABLE.mark_linked(&self.pool, request_id).await
    }
}
