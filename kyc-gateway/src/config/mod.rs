//! Configuration management for the KYC gateway

use anyhow::{bail, Context, Result};
use std::env;

/// Minimum HS256 secret length accepted in production
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Deployment environment ("development", "production", ...)
    pub environment: String,
    /// Database configuration, one URL per identity domain
    pub database: DatabaseConfig,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// OTP challenge configuration
    pub otp: OtpConfig,
    /// Accept JSON bodies sent with a form content type
    pub lenient_content_type: bool,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Logging and metrics configuration
    pub telemetry: TelemetryConfig,
    /// Apply embedded migrations on `serve` start-up
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub pan_url: String,
    pub aadhaar_url: String,
    pub kyc_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_ttl_secs: i64,
    /// Serve `POST /login` (development token issuer)
    pub dev_login_enabled: bool,
}

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Expose the Prometheus endpoint at /metrics
    pub metrics_enabled: bool,
    /// "text" or "json"
    pub log_format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            log_format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub ttl_secs: i64,
    pub max_attempts: i32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            max_attempts: 5,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

/// Replace the database name in a Postgres URL, keeping any query string.
///
/// `postgres://user:pass@db:5432/postgres?sslmode=disable` with `pan_db`
/// becomes `postgres://user:pass@db:5432/pan_db?sslmode=disable`.
pub fn with_database_name(url: &str, name: &str) -> Result<String> {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };

    let authority_start = base
        .find("://")
        .map(|i| i + 3)
        .with_context(|| format!("Invalid database URL (missing scheme): {}", url))?;

    let server = match base[authority_start..].find('/') {
        Some(slash) => &base[..authority_start + slash],
        None => base,
    };

    Ok(match query {
        Some(q) => format!("{}/{}?{}", server, name, q),
        None => format!("{}/{}", server, name),
    })
}

fn domain_database_url(explicit: &str, server_url: Option<&str>, name: &str) -> Result<String> {
    if let Ok(url) = env::var(explicit) {
        return Ok(url);
    }
    let server_url =
        server_url.with_context(|| format!("{} or DATABASE_URL is required", explicit))?;
    with_database_name(server_url, name)
}

impl TelemetryConfig {
    /// Load telemetry settings only, so logging can start before the full config is validated
    pub fn from_env() -> Self {
        Self {
            metrics_enabled: env_flag("METRICS_ENABLED", false),
            log_format: env::var("LOG_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| "text".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment.eq_ignore_ascii_case("production");
        let server_url = env::var("DATABASE_URL").ok();

        let config = Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            database: DatabaseConfig {
                pan_url: domain_database_url("PAN_DATABASE_URL", server_url.as_deref(), "pan_db")?,
                aadhaar_url: domain_database_url(
                    "AADHAAR_DATABASE_URL",
                    server_url.as_deref(),
                    "aadhaar_db",
                )?,
                kyc_url: domain_database_url("KYC_DATABASE_URL", server_url.as_deref(), "kyc_db")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("Invalid DATABASE_MAX_CONNECTIONS")?,
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .context("Invalid DATABASE_MIN_CONNECTIONS")?,
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").context("JWT_SECRET is required")?,
                issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "kyc-gateway".to_string()),
                access_token_ttl_secs: env::var("JWT_ACCESS_TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .context("Invalid JWT_ACCESS_TOKEN_TTL_SECS")?,
                dev_login_enabled: env_flag("DEV_LOGIN_ENABLED", !is_production),
            },
            otp: OtpConfig {
                ttl_secs: env::var("OTP_TTL_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .context("Invalid OTP_TTL_SECS")?,
                max_attempts: env::var("OTP_MAX_ATTEMPTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .context("Invalid OTP_MAX_ATTEMPTS")?,
            },
            lenient_content_type: env_flag("LENIENT_CONTENT_TYPE", true),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECS")?,
            telemetry: TelemetryConfig::from_env(),
            run_migrations: env_flag("RUN_MIGRATIONS", false),
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that are unsafe or meaningless
    pub fn validate(&self) -> Result<()> {
        if self.is_production() && self.jwt.secret.len() < MIN_PRODUCTION_SECRET_LEN {
            bail!(
                "JWT_SECRET must be at least {} bytes in production",
                MIN_PRODUCTION_SECRET_LEN
            );
        }
        if self.jwt.secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        if self.otp.max_attempts < 1 {
            bail!("OTP_MAX_ATTEMPTS must be at least 1");
        }
        if self.otp.ttl_secs < 1 {
            bail!("OTP_TTL_SECS must be positive");
        }
        if self.database.min_connections > self.database.max_connections {
            bail!("DATABASE_MIN_CONNECTIONS exceeds DATABASE_MAX_CONNECTIONS");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Bindable `host:port`; IPv6 literals are bracketed
    pub fn http_addr(&self) -> String {
        if self.http_host.contains(':') && !self.http_host.starts_with('[') {
            format!("[{}]:{}", self.http_host, self.http_port)
        } else {
            format!("{}:{}", self.http_host, self.http_port)
        }
    }
}
