//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`], so the production `AppState`
//! and the in-memory state used by the HTTP tests drive the same router.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{AadhaarLinkRequestRepository, KycRepository, PanLinkRequestRepository};
use crate::service::{AadhaarService, KycService, PanService};

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The PAN link request repository type
    type PanRepo: PanLinkRequestRepository;
    /// The Aadhaar link request repository type
    type AadhaarRepo: AadhaarLinkRequestRepository;
    /// The KYC session repository type
    type KycRepo: KycRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the PAN verification service
    fn pan_service(&self) -> &PanService<Self::PanRepo>;

    /// Get the Aadhaar verification service
    fn aadhaar_service(&self) -> &AadhaarService<Self::AadhaarRepo>;

    /// Get the KYC onboarding service
    fn kyc_service(&self) -> &KycService<Self::KycRepo>;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Check if every domain database answers
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
