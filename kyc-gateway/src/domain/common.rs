//! Common types for domain models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Build an opaque identifier: `prefix` followed by the first 8 hex digits
/// of a random v4 UUID, upper-cased (`PAN_1A2B3C4D`).
pub fn generate_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, simple[..8].to_uppercase())
}

/// RFC 3339 timestamp in UTC with a `Z` suffix
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Identity domain a link request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkDomain {
    Pan,
    Aadhaar,
}

impl LinkDomain {
    /// Path segment and metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkDomain::Pan => "pan",
            LinkDomain::Aadhaar => "aadhaar",
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            LinkDomain::Pan => "PAN_",
            LinkDomain::Aadhaar => "ADR_",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinkDomain::Pan => "PAN",
            LinkDomain::Aadhaar => "Aadhaar",
        }
    }
}

impl std::fmt::Display for LinkDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link request lifecycle. Transitions only move forward:
/// `PENDING_OTP -> OTP_SENT -> OTP_VERIFIED -> LINKED`, with `OTP_SENT`
/// re-entrant on resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    #[default]
    PendingOtp,
    OtpSent,
    OtpVerified,
    Linked,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::PendingOtp => "PENDING_OTP",
            LinkStatus::OtpSent => "OTP_SENT",
            LinkStatus::OtpVerified => "OTP_VERIFIED",
            LinkStatus::Linked => "LINKED",
        }
    }

    /// Whether a (re)send of the OTP is allowed from this state
    pub fn can_send_otp(&self) -> bool {
        matches!(self, LinkStatus::PendingOtp | LinkStatus::OtpSent)
    }
}

impl std::str::FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING_OTP" => Ok(LinkStatus::PendingOtp),
            "OTP_SENT" => Ok(LinkStatus::OtpSent),
            "OTP_VERIFIED" => Ok(LinkStatus::OtpVerified),
            "LINKED" => Ok(LinkStatus::Linked),
            _ => Err(format!("Unknown link status: {}", s)),
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for LinkStatus {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let s: String = sqlx::Decode::<'r, sqlx::Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl sqlx::Type<sqlx::Postgres> for LinkStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

/// Read access to the fields every link request carries, whatever its domain
pub trait LinkRecord: Clone + Send + Sync + 'static {
    fn request_id(&self) -> &str;
    fn status(&self) -> LinkStatus;
    fn otp_hash(&self) -> Option<&str>;
    fn otp_expires_at(&self) -> Option<DateTime<Utc>>;
    fn otp_attempts(&self) -> i32;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// Implements [`LinkRecord`] for a struct with the standard column fields.
macro_rules! impl_link_record {
    ($ty:ty) => {
        impl $crate::domain::common::LinkRecord for $ty {
            fn request_id(&self) -> &str {
                &self.request_id
            }
            fn status(&self) -> $crate::domain::common::LinkStatus {
                self.status
            }
            fn otp_hash(&self) -> Option<&str> {
                self.otp_hash.as_deref()
            }
            fn otp_expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.otp_expires_at
            }
            fn otp_attempts(&self) -> i32 {
                self.otp_attempts
            }
            fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.updated_at
            }
        }
    };
}
pub(crate) use impl_link_record;
