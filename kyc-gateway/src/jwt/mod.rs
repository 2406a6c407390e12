//! JWT token handling

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Audience every gateway access token is issued for
pub const GATEWAY_AUDIENCE: &str = "kyc-gateway";

const ACCESS_TOKEN_TYPE: &str = "access";

/// Access token claims accepted on `/v1/**`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (operator or client identifier)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Token type discriminator (prevents token confusion attacks)
    #[serde(default)]
    pub token_type: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager (HS256, shared secret)
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a Validation with a strict leeway (5 seconds) instead of the default 60 seconds.
    fn strict_validation(&self) -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        v.leeway = 5;
        v
    }

    /// Create an access token for `subject`
    pub fn create_access_token(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.access_token_ttl_secs);

        let claims = AccessClaims {
            sub: subject.to_string(),
            iss: self.config.issuer.clone(),
            aud: GATEWAY_AUDIENCE.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &self.encoding_key).map_err(|e| AppError::Internal(e.into()))
    }

    /// Verify and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let mut validation = self.strict_validation();
        validation.set_audience(&[GATEWAY_AUDIENCE]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &validation)?;
        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(AppError::Unauthorized(format!(
                "Unexpected token type: {:?}",
                token_data.claims.token_type
            )));
        }
        Ok(token_data.claims)
    }

    /// Get token expiration TTL in seconds
    pub fn access_token_ttl(&self) -> i64 {
        self.config.access_token_ttl_secs
    }
}
