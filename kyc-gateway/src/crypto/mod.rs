//! Hashing helpers for identity numbers and OTP challenges

use crate::error::{AppError, Result};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded SHA-256 of `value`
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

fn otp_mac(secret: &[u8], request_id: &str, code: &str) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init error: {}", e)))?;
    mac.update(request_id.as_bytes());
    mac.update(code.as_bytes());
    Ok(mac)
}

/// HMAC-SHA256(secret, request_id || code), hex encoded.
///
/// Binding the request id means a digest copied between rows never verifies.
pub fn otp_digest(secret: &[u8], request_id: &str, code: &str) -> Result<String> {
    let mac = otp_mac(secret, request_id, code)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check `code` against a stored hex digest in constant time
pub fn verify_otp_digest(
    secret: &[u8],
    request_id: &str,
    code: &str,
    stored_hex: &str,
) -> Result<bool> {
    let Ok(stored) = hex::decode(stored_hex) else {
        return Ok(false);
    };
    let mac = otp_mac(secret, request_id, code)?;
    Ok(mac.verify_slice(&stored).is_ok())
}
