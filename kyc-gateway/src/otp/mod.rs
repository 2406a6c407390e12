//! OTP delivery seam and code generation

use crate::domain::LinkDomain;
use crate::error::Result;
use async_trait::async_trait;
use rand::Rng;

/// Number of digits in a one-time code
pub const OTP_LENGTH: usize = 6;

/// Delivers a one-time code to the customer.
///
/// Production deployments plug in the SMS or registry gateway here; the
/// gateway itself never talks to NSDL or UIDAI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, domain: LinkDomain, request_id: &str, code: &str) -> Result<()>;
}

/// Writes deliveries to the log instead of an external gateway
#[derive(Debug, Default, Clone)]
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, domain: LinkDomain, request_id: &str, code: &str) -> Result<()> {
        tracing::info!(domain = %domain, request_id = %request_id, "OTP dispatched");
        tracing::debug!(domain = %domain, request_id = %request_id, otp = %code, "OTP code");
        Ok(())
    }
}

/// Random numeric code of [`OTP_LENGTH`] digits, leading zeros kept
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Whether `code` has the shape of an OTP
pub fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
