//! PAN link request repository (pan_db)

use super::link::{LinkRequestRepository, LinkTable};
use crate::domain::{generate_id, CreatePanLinkInput, LinkDomain, LinkStatus, PanLinkRequest};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const PAN_TABLE: LinkTable = LinkTable {
    table: "pan_link_requests",
    columns: "request_id, pan_number, customer_name, status, otp_hash, otp_expires_at, \
              otp_attempts, created_at, updated_at",
};

/// Link request storage for the PAN domain
pub trait PanLinkRequestRepository:
    LinkRequestRepository<Record = PanLinkRequest, NewRecord = CreatePanLinkInput>
{
}

impl<T> PanLinkRequestRepository for T where
    T: LinkRequestRepository<Record = PanLinkRequest, NewRecord = CreatePanLinkInput>
{
}

pub struct PanLinkRequestRepositoryImpl {
    pool: PgPool,
}

impl PanLinkRequestRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRequestRepository for PanLinkRequestRepositoryImpl {
    type Record = PanLinkRequest;
    type NewRecord = CreatePanLinkInput;

    async fn create(&self, input: &CreatePanLinkInput) -> Result<PanLinkRequest> {
        let request_id = generate_id(LinkDomain::Pan.id_prefix());

        let record = sqlx::query_as::<_, PanLinkRequest>(
            r#"
            INSERT INTO pan_link_requests
                (request_id, pan_number, customer_name, status, otp_attempts, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, NOW(), NOW())
            RETURNING request_id, pan_number, customer_name, status, otp_hash, otp_expires_at,
                      otp_attempts, created_at, updated_at
            "#,
        )
        .bind(&request_id)
        .bind(&input.pan_number)
        .bind(input.customer_name.trim())
        .bind(LinkStatus::PendingOtp.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, request_id: &str) -> Result<Option<PanLinkRequest>> {
        PAN_TABLE.find_by_id(&self.pool, request_id).await
    }

    async fn store_otp(
        &self,
        request_id: &str,
        otp_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<PanLinkRequest>> {
        PAN_TABLE
            .store_otp(&self.pool, request_id, otp_hash, expires_at)
            .await
    }

    async fn record_failed_attempt(
        &self,
        request_id: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>> {
        PAN_TABLE
            .record_failed_attempt(&self.pool, request_id, max_attempts)
            .await
    }

    async fn mark_verified(
        &self,
        request_id: &str,
        otp_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<PanLinkRequest>> {
        PAN_TABLE
            .mark_verified(&self.pool, request_id, otp_hash, max_attempts)
            .await
    }

    async fn mark_linked(&self, request_id: &str) -> Result<Option<PanLinkRequest>> {
        PAN_TABLE.mark_linked(&self.pool, request_id).await
    }
}
