//! OTP-gated link lifecycle shared by the PAN and Aadhaar services
//!
//! `PENDING_OTP -> OTP_SENT -> OTP_VERIFIED -> LINKED`. Status never moves
//! backwards; a resend keeps the request in `OTP_SENT` with a fresh challenge.

use crate::crypto::{otp_digest, verify_otp_digest};
use crate::domain::{LinkDomain, LinkRecord, LinkStatus};
use crate::error::{AppError, Result};
use crate::otp::{self, OtpSender};
use crate::repository::LinkRequestRepository;
use chrono::{Duration, Utc};
use metrics::counter;
use std::sync::Arc;

/// OTP challenge parameters
#[derive(Clone)]
pub struct OtpPolicy {
    /// HMAC key for stored code digests
    pub hmac_key: Arc<[u8]>,
    pub ttl_secs: i64,
    pub max_attempts: i32,
}

impl std::fmt::Debug for OtpPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtpPolicy")
            .field("ttl_secs", &self.ttl_secs)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

pub struct LinkService<R: LinkRequestRepository> {
    domain: LinkDomain,
    repo: Arc<R>,
    otp_sender: Arc<dyn OtpSender>,
    policy: OtpPolicy,
}

impl<R: LinkRequestRepository> LinkService<R> {
    pub fn new(
        domain: LinkDomain,
        repo: Arc<R>,
        otp_sender: Arc<dyn OtpSender>,
        policy: OtpPolicy,
    ) -> Self {
        Self {
            domain,
            repo,
            otp_sender,
            policy,
        }
    }

    pub fn domain(&self) -> LinkDomain {
        self.domain
    }

    /// Persist a new request in `PENDING_OTP`
    pub async fn create(&self, input: &R::NewRecord) -> Result<R::Record> {
        let record = self.repo.create(input).await?;

        counter!("kyc_link_requests_total", "domain" => self.domain.as_str(), "result" => "created")
            .increment(1);
        tracing::info!(
            domain = %self.domain,
            request_id = %record.request_id(),
            "Link request created"
        );
        Ok(record)
    }

    pub async fn get(&self, request_id: &str) -> Result<R::Record> {
        self.repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| self.not_found(request_id))
    }

    /// Issue a fresh code and move to `OTP_SENT`
    ///
    /// The challenge is stored before delivery. If delivery fails the request
    /// is left in `OTP_SENT` with a code nobody received; the caller gets the
    /// error and a resend replaces the challenge.
    pub async fn send_otp(&self, request_id: &str) -> Result<R::Record> {
        let current = self.get(request_id).await?;
        if !current.status().can_send_otp() {
            return Err(AppError::Conflict(format!(
                "OTP cannot be sent for a request in status {}",
                current.status()
            )));
        }

        let code = otp::generate_code();
        let otp_hash = otp_digest(&self.policy.hmac_key, request_id, &code)?;
        let expires_at = Utc::now() + Duration::seconds(self.policy.ttl_secs);

        let record = self
            .repo
            .store_otp(request_id, &otp_hash, expires_at)
            .await?
            .ok_or_else(|| self.lost_race(request_id))?;

        if let Err(e) = self.otp_sender.send(self.domain, request_id, &code).await {
            tracing::warn!(
                domain = %self.domain,
                request_id = %request_id,
                error = %e,
                "OTP delivery failed; challenge stored, resend required"
            );
            return Err(e);
        }

        counter!("kyc_link_requests_total", "domain" => self.domain.as_str(), "result" => "otp_sent")
            .increment(1);
        Ok(record)
    }

    /// Check `code` against the current challenge and move to `OTP_VERIFIED`
    pub async fn verify_otp(&self, request_id: &str, code: &str) -> Result<R::Record> {
        if !otp::is_well_formed(code) {
            return Err(AppError::Validation(format!(
                "otp must be exactly {} digits",
                otp::OTP_LENGTH
            )));
        }

        let current = self.get(request_id).await?;
        if current.status() != LinkStatus::OtpSent {
            return Err(AppError::Conflict(format!(
                "OTP cannot be verified for a request in status {}",
                current.status()
            )));
        }

        if current.otp_attempts() >= self.policy.max_attempts {
            return Err(self.locked());
        }

        let (otp_hash, expires_at) = match (current.otp_hash(), current.otp_expires_at()) {
            (Some(hash), Some(expires_at)) => (hash.to_string(), expires_at),
            _ => return Err(self.lost_race(request_id)),
        };

        if expires_at <= Utc::now() {
            self.record_verification("expired");
            return Err(AppError::BadRequest(
                "OTP has expired. Request a new OTP.".to_string(),
            ));
        }

        if !verify_otp_digest(&self.policy.hmac_key, request_id, code, &otp_hash)? {
            let attempts = match self
                .repo
                .record_failed_attempt(request_id, self.policy.max_attempts)
                .await?
            {
                Some(attempts) => attempts,
                None => return Err(self.rejected_attempt(request_id).await?),
            };
            self.record_verification("invalid");
            tracing::warn!(
                domain = %self.domain,
                request_id = %request_id,
                attempts,
                "Invalid OTP submitted"
            );
            return Err(AppError::BadRequest("Invalid OTP".to_string()));
        }

        let record = match self
            .repo
            .mark_verified(request_id, &otp_hash, self.policy.max_attempts)
            .await?
        {
            Some(record) => record,
            None => return Err(self.rejected_attempt(request_id).await?),
        };
        self.record_verification("verified");
        Ok(record)
    }

    /// `OTP_VERIFIED -> LINKED`
    pub async fn finalize(&self, request_id: &str) -> Result<R::Record> {
        let current = self.get(request_id).await?;
        match current.status() {
            LinkStatus::OtpVerified => {}
            LinkStatus::Linked => {
                return Err(AppError::Conflict(format!(
                    "Request {} is already linked",
                    request_id
                )))
            }
            _ => return Err(AppError::BadRequest(self.finalize_precondition().to_string())),
        }

        let record = self
            .repo
            .mark_linked(request_id)
            .await?
            .ok_or_else(|| self.lost_race(request_id))?;

        counter!("kyc_link_requests_total", "domain" => self.domain.as_str(), "result" => "linked")
            .increment(1);
        tracing::info!(domain = %self.domain, request_id = %request_id, "Link finalized");
        Ok(record)
    }

    fn finalize_precondition(&self) -> &'static str {
        match self.domain {
            LinkDomain::Pan => "OTP must be verified before finalizing link.",
            LinkDomain::Aadhaar => "Aadhaar OTP must be verified before final link.",
        }
    }

    fn not_found(&self, request_id: &str) -> AppError {
        AppError::NotFound(format!(
            "{} link request {} not found",
            self.domain.label(),
            request_id
        ))
    }

    /// Explain why a bounded verify update matched no row. Concurrent wrong
    /// guesses can use up the attempt budget between the read and the update.
    async fn rejected_attempt(&self, request_id: &str) -> Result<AppError> {
        let current = self.get(request_id).await?;
        if current.status() == LinkStatus::OtpSent
            && current.otp_attempts() >= self.policy.max_attempts
        {
            return Ok(self.locked());
        }
        Ok(self.lost_race(request_id))
    }

    fn locked(&self) -> AppError {
        self.record_verification("locked");
        AppError::Forbidden("Too many failed OTP attempts. Request a new OTP.".to_string())
    }

    /// A conditional update matched no row: another request moved the state first
    fn lost_race(&self, request_id: &str) -> AppError {
        AppError::Conflict(format!(
            "{} link request {} was modified concurrently",
            self.domain.label(),
            request_id
        ))
    }

    fn record_verification(&self, result: &'static str) {
        counter!("kyc_otp_verifications_total", "domain" => self.domain.as_str(), "result" => result)
            .increment(1);
    }
}
