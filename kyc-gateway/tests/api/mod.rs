//! API integration tests infrastructure
//!
//! In-memory repositories and an OTP sender that remembers the codes it
//! delivers, so handler tests run without Postgres or an SMS gateway.

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use kyc_gateway::config::JwtConfig;
use kyc_gateway::domain::{
    generate_id, AadhaarLinkRequest, AddDocumentInput, CreatePanLinkInput, CreateSessionInput,
    KycDocument, KycSession, LinkDomain, LinkRecord, LinkStatus, NewAadhaarLinkRequest,
    PanLinkRequest, DOCUMENT_STATE_UPLOADED, SESSION_STATUS_CREATED,
};
use kyc_gateway::error::Result;
use kyc_gateway::jwt::JwtManager;
use kyc_gateway::otp::OtpSender;
use kyc_gateway::repository::{KycRepository, LinkRequestRepository};
use std::collections::HashMap;
use tokio::sync::{RwLock, RwLockWriteGuard};

// ============================================================================
// Test Configuration
// ============================================================================

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-api-testing-purposes".to_string(),
        issuer: "https://kyc.test".to_string(),
        access_token_ttl_secs: 3600,
        dev_login_enabled: true,
    }
}

pub fn create_test_jwt_manager() -> JwtManager {
    JwtManager::new(test_jwt_config())
}

/// Access token accepted by the test router
pub fn create_test_token() -> String {
    create_test_jwt_manager()
        .create_access_token("load-tester")
        .expect("Failed to create test access token")
}

// ============================================================================
// Link request records
// ============================================================================

/// Mutable view of the OTP challenge columns of a record
pub struct Challenge<'a> {
    pub status: &'a mut LinkStatus,
    pub otp_hash: &'a mut Option<String>,
    pub otp_expires_at: &'a mut Option<DateTime<Utc>>,
    pub otp_attempts: &'a mut i32,
    pub updated_at: &'a mut DateTime<Utc>,
}

/// Record type the in-memory link repository can store
pub trait TestRecord: LinkRecord {
    type New: Send + Sync + 'static;

    fn build(request_id: String, input: &Self::New) -> Self;
    fn challenge(&mut self) -> Challenge<'_>;
}

impl TestRecord for PanLinkRequest {
    type New = CreatePanLinkInput;

    fn build(request_id: String, input: &CreatePanLinkInput) -> Self {
        let now = Utc::now();
        PanLinkRequest {
            request_id,
            pan_number: input.pan_number.clone(),
            customer_name: input.customer_name.trim().to_string(),
            status: LinkStatus::PendingOtp,
            otp_hash: None,
            otp_expires_at: None,
            otp_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn challenge(&mut self) -> Challenge<'_> {
        Challenge {
            status: &mut self.status,
            otp_hash: &mut self.otp_hash,
            otp_expires_at: &mut self.otp_expires_at,
            otp_attempts: &mut self.otp_attempts,
            updated_at: &mut self.updated_at,
        }
    }
}

impl TestRecord for AadhaarLinkRequest {
    type New = NewAadhaarLinkRequest;

    fn build(request_id: String, input: &NewAadhaarLinkRequest) -> Self {
        let now = Utc::now();
        AadhaarLinkRequest {
            request_id,
            aadhaar_hash: input.aadhaar_hash.clone(),
            masked_aadhaar: input.masked_aadhaar.clone(),
            consent_obtained: true,
            status: LinkStatus::PendingOtp,
            otp_hash: None,
            otp_expires_at: None,
            otp_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn challenge(&mut self) -> Challenge<'_> {
        Challenge {
            status: &mut self.status,
            otp_hash: &mut self.otp_hash,
            otp_expires_at: &mut self.otp_expires_at,
            otp_attempts: &mut self.otp_attempts,
            updated_at: &mut self.updated_at,
        }
    }
}

// ============================================================================
// Test Link Request Repository
// ============================================================================

pub struct TestLinkRepository<T> {
    domain: LinkDomain,
    records: RwLock<Vec<T>>,
}

impl<T: TestRecord> TestLinkRepository<T> {
    pub fn new(domain: LinkDomain) -> Self {
        Self {
            domain,
            records: RwLock::new(vec![]),
        }
    }

    pub async fn get(&self, request_id: &str) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.request_id() == request_id)
            .cloned()
    }

    #[allow(dead_code)]
    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    /// Move the current challenge's expiry into the past
    #[allow(dead_code)]
    pub async fn expire_otp(&self, request_id: &str) {
        self.update(request_id, |c| {
            *c.otp_expires_at = Some(Utc::now() - Duration::seconds(1));
            true
        })
        .await;
    }

    /// Block every repository call until the guard is dropped, so queued
    /// requests all read the same state before any of them writes
    #[allow(dead_code)]
    pub async fn hold(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.records.write().await
    }

    /// Apply `f` to the record; keep the change only when `f` returns true
    async fn update<F>(&self, request_id: &str, f: F) -> Option<T>
    where
        F: FnOnce(Challenge<'_>) -> bool,
    {
        let mut records = self.records.write().await;
        let record = records.iter_mut().find(|r| r.request_id() == request_id)?;
        let mut candidate = record.clone();
        if f(candidate.challenge()) {
            *record = candidate.clone();
            Some(candidate)
        } else {
            None
        }
    }
}

#[async_trait]
impl<T: TestRecord> LinkRequestRepository for TestLinkRepository<T> {
    type Record = T;
    type NewRecord = T::New;

    async fn create(&self, input: &T::New) -> Result<T> {
        let record = T::build(generate_id(self.domain.id_prefix()), input);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, request_id: &str) -> Result<Option<T>> {
        Ok(self.get(request_id).await)
    }

    async fn store_otp(
        &self,
        request_id: &str,
        otp_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<T>> {
        Ok(self
            .update(request_id, |c| {
                if !matches!(*c.status, LinkStatus::PendingOtp | LinkStatus::OtpSent) {
                    return false;
                }
                *c.status = LinkStatus::OtpSent;
                *c.otp_hash = Some(otp_hash.to_string());
                *c.otp_expires_at = Some(expires_at);
                *c.otp_attempts = 0;
                *c.updated_at = Utc::now();
                true
            })
            .await)
    }

    async fn record_failed_attempt(
        &self,
        request_id: &str,
        max_attempts: i32,
    ) -> Result<Option<i32>> {
        let updated = self
            .update(request_id, |c| {
                if *c.status != LinkStatus::OtpSent || *c.otp_attempts >= max_attempts {
                    return false;
                }
                *c.otp_attempts += 1;
                *c.updated_at = Utc::now();
                true
            })
            .await;
        Ok(updated.map(|r| r.otp_attempts()))
    }

    async fn mark_verified(
        &self,
        request_id: &str,
        otp_hash: &str,
        max_attempts: i32,
    ) -> Result<Option<T>> {
        Ok(self
            .update(request_id, |c| {
                if *c.status != LinkStatus::OtpSent
                    || c.otp_hash.as_deref() != Some(otp_hash)
                    || *c.otp_attempts >= max_attempts
                {
                    return false;
                }
                *c.status = LinkStatus::OtpVerified;
                *c.otp_hash = None;
                *c.otp_expires_at = None;
                *c.otp_attempts = 0;
                *c.updated_at = Utc::now();
                true
            })
            .await)
    }

    async fn mark_linked(&self, request_id: &str) -> Result<Option<T>> {
        Ok(self
            .update(request_id, |c| {
                if *c.status != LinkStatus::OtpVerified {
                    return false;
                }
                *c.status = LinkStatus::Linked;
                *c.updated_at = Utc::now();
                true
            })
            .await)
    }
}

pub type TestPanRepository = TestLinkRepository<PanLinkRequest>;
pub type TestAadhaarRepository = TestLinkRepository<AadhaarLinkRequest>;

// ============================================================================
// Test KYC Repository
// ============================================================================

#[derive(Default)]
pub struct TestKycRepository {
    sessions: RwLock<Vec<KycSession>>,
    documents: RwLock<Vec<KycDocument>>,
}

impl TestKycRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KycRepository for TestKycRepository {
    async fn create_session(&self, input: &CreateSessionInput) -> Result<KycSession> {
        let session = KycSession {
            id: generate_id("sess_"),
            kyc_purpose: input.kyc_purpose.clone(),
            jurisdiction: input.jurisdiction.clone(),
            customer: input.customer.clone(),
            status: SESSION_STATUS_CREATED.to_string(),
            created_at: Utc::now(),
        };
        self.sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<KycSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().find(|s| s.id == session_id).cloned())
    }

    async fn add_document(&self, session_id: &str, input: &AddDocumentInput) -> Result<KycDocument> {
        let document = KycDocument {
            id: generate_id("doc_"),
            session_id: session_id.to_string(),
            document_type: input.document_type.as_str().to_string(),
            side: input.side.as_str().to_string(),
            country: input.country.clone(),
            state: DOCUMENT_STATE_UPLOADED.to_string(),
            uploaded_at: Utc::now(),
        };
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn list_documents(&self, session_id: &str) -> Result<Vec<KycDocument>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| d.session_id == session_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Test OTP Sender
// ============================================================================

/// Remembers the last code delivered for every request
#[derive(Default)]
pub struct TestOtpSender {
    codes: RwLock<HashMap<String, String>>,
}

impl TestOtpSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn last_code(&self, request_id: &str) -> Option<String> {
        self.codes.read().await.get(request_id).cloned()
    }
}

#[async_trait]
impl OtpSender for TestOtpSender {
    async fn send(&self, _domain: LinkDomain, request_id: &str, code: &str) -> Result<()> {
        self.codes
            .write()
            .await
            .insert(request_id.to_string(), code.to_string());
        Ok(())
    }
}

/// A six digit code different from `code`
pub fn wrong_code(code: &str) -> String {
    if code == "000000" {
        "111111".to_string()
    } else {
        "000000".to_string()
    }
}
