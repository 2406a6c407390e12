//! Domain models for the KYC gateway

pub mod aadhaar;
pub mod common;
pub mod kyc;
pub mod pan;

pub use aadhaar::*;
pub use common::{format_timestamp, generate_id, LinkDomain, LinkRecord, LinkStatus};
pub use kyc::*;
pub use pan::*;
