//! Data access layer (Repository pattern)
//!
//! Each identity domain lives in its own Postgres database, so every
//! repository owns the pool for exactly one of `pan_db`, `aadhaar_db`, `kyc_db`.

pub mod aadhaar;
pub mod kyc;
pub mod link;
pub mod pan;

pub use aadhaar::{AadhaarLinkRequestRepository, AadhaarLinkRequestRepositoryImpl};
pub use kyc::{KycRepository, KycRepositoryImpl};
pub use link::LinkRequestRepository;
pub use pan::{PanLinkRequestRepository, PanLinkRequestRepositoryImpl};

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// One connection pool per domain database
#[derive(Clone)]
pub struct DbPools {
    pub pan: PgPool,
    pub aadhaar: PgPool,
    pub kyc: PgPool,
}

impl DbPools {
    /// Connect lazily; the first query on each pool opens its connections.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self {
            pan: pool_options(config)
                .connect_lazy(&config.pan_url)
                .context("Invalid PAN database URL")?,
            aadhaar: pool_options(config)
                .connect_lazy(&config.aadhaar_url)
                .context("Invalid Aadhaar database URL")?,
            kyc: pool_options(config)
                .connect_lazy(&config.kyc_url)
                .context("Invalid KYC database URL")?,
        })
    }

    /// Pools keyed by their database name
    pub fn named(&self) -> [(&'static str, &PgPool); 3] {
        [
            ("pan_db", &self.pan),
            ("aadhaar_db", &self.aadhaar),
            ("kyc_db", &self.kyc),
        ]
    }

    /// Ping every database; used by the readiness probe
    pub async fn ping(&self) -> std::result::Result<(), sqlx::Error> {
        for (name, pool) in self.named() {
            if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
                tracing::warn!(database = name, error = %e, "Database ping failed");
                return Err(e);
            }
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pan.close().await;
        self.aadhaar.close().await;
        self.kyc.close().await;
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(5))
}
