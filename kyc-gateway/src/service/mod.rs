//! Business logic layer

pub mod aadhaar;
pub mod kyc;
pub mod link;
pub mod pan;

pub use aadhaar::AadhaarService;
pub use kyc::KycService;
pub use link::{LinkService, OtpPolicy};
pub use pan::PanService;
