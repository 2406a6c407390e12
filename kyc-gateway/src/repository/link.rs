//! Link request storage shared by the PAN and Aadhaar domains
//!
//! Every state transition is a single conditional `UPDATE ... WHERE status = ...`
//! so two concurrent transitions on one request cannot both succeed. A
//! transition that matched no row returns `None`.

use crate::domain::{LinkRecord, LinkStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

#[cfg_attr(
    test,
    mockall::automock(
        type Record = crate::domain::AadhaarLinkRequest;
        type NewRecord = crate::domain::NewAadhaarLinkRequest;
    )
)]
#[async_trait]
pub trait LinkRequestRepository: Send + Sync + 'static {
    type Record: LinkRecord;
    type NewRecord: Send + Sync + 'static;

    /// Insert a new request in `PENDING_OTP`
    async fn create(&self, input: &Self::NewRecord) -> Result<Self::Record>;

    async fn find_by_id(&self, request_id: &str) -> Result<Option<Self::Record>>;

    /// Replace the OTP challenge and move to `OTP_SENT`, resetting attempts.
    /// Only applies from `PENDING_OTP` or `OTP_SENT`.
    async fn store_otp(
        &self,
        request_id: &str,
        otp_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<Self::Record>>;

    /// Count a wrong code against the current challenge and return the new
    /// count. Matches no row once `max_attempts` failures are recorded.
    async fn record_failed_attempt(
        &self,
        request_id: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>>;

    /// `OTP_SENT -> OTP_VERIFIED`, only while `otp_hash` is still the challenge
    /// that was checked and fewer than `max_attempts` failures are recorded.
    /// Clears the challenge.
    async fn mark_verified(
        &self,
        request_id: &str,
        otp_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<Self::Record>>;

    /// `OTP_VERIFIED -> LINKED`
    async fn mark_linked(&self, request_id: &str) -> Result<Option<Self::Record>>;
}

/// Table and column list of a link request table
pub(crate) struct LinkTable {
    pub table: &'static str,
    pub columns: &'static str,
}

impl LinkTable {
    pub async fn find_by_id<R>(&self, pool: &PgPool, request_id: &str) -> Result<Option<R>>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            "SELECT {} FROM {} WHERE request_id = $1",
            self.columns, self.table
        );
        let record = sqlx::query_as::<_, R>(&sql)
            .bind(request_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn store_otp<R>(
        &self,
        pool: &PgPool,
        request_id: &str,
        otp_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<R>>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            r#"
            UPDATE {}
            SET status = $2, otp_hash = $3, otp_expires_at = $4, otp_attempts = 0, updated_at = NOW()
            WHERE request_id = $1 AND status IN ($5, $2)
            RETURNING {}
            "#,
            self.table, self.columns
        );
        let record = sqlx::query_as::<_, R>(&sql)
            .bind(request_id)
            .bind(LinkStatus::OtpSent.as_str())
            .bind(otp_hash)
            .bind(expires_at)
            .bind(LinkStatus::PendingOtp.as_str())
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn record_failed_attempt(
        &self,
        pool: &PgPool,
        request_id: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>> {
        let sql = format!(
            r#"
            UPDATE {}
            SET otp_attempts = otp_attempts + 1, updated_at = NOW()
            WHERE request_id = $1 AND status = $2 AND otp_attempts < $3
            RETURNING otp_attempts
            "#,
            self.table
        );
        let attempts = sqlx::query_scalar::<_, i32>(&sql)
            .bind(request_id)
            .bind(LinkStatus::OtpSent.as_str())
            .bind(max_attempts)
            .fetch_optional(pool)
            .await?;

        Ok(attempts)
    }

    pub async fn mark_verified<R>(
        &self,
        pool: &PgPool,
        request_id: &str,
        otp_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<R>>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            r#"
            UPDATE {}
            SET status = $2, otp_hash = NULL, otp_expires_at = NULL, otp_attempts = 0, updated_at = NOW()
            WHERE request_id = $1 AND status = $3 AND otp_hash = $4 AND otp_attempts < $5
            RETURNING {}
            "#,
            self.table, self.columns
        );
        let record = sqlx::query_as::<_, R>(&sql)
            .bind(request_id)
            .bind(LinkStatus::OtpVerified.as_str())
            .bind(LinkStatus::OtpSent.as_str())
            .bind(otp_hash)
            .bind(max_attempts)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    pub async fn mark_linked<R>(&self, pool: &PgPool, request_id: &str) -> Result<Option<R>>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            r#"
            UPDATE {}
            SET status = $2, updated_at = NOW()
            WHERE request_id = $1 AND status = $3
            RETURNING {}
            "#,
            self.table, self.columns
        );
        let record = sqlx::query_as::<_, R>(&sql)
            .bind(request_id)
            .bind(LinkStatus::Linked.as_str())
            .bind(LinkStatus::OtpVerified.as_str())
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }
}
