//! Database migrations
//!
//! Each domain database carries its own migration set, embedded at build
//! time. The databases themselves are provisioned outside the gateway; only
//! tables are created here.

use crate::repository::DbPools;
use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

static PAN_MIGRATOR: Migrator = sqlx::migrate!("./migrations/pan");
static AADHAAR_MIGRATOR: Migrator = sqlx::migrate!("./migrations/aadhaar");
static KYC_MIGRATOR: Migrator = sqlx::migrate!("./migrations/kyc");

async fn migrate(name: &str, migrator: &Migrator, pool: &PgPool) -> Result<()> {
    info!(database = name, "Running database migrations...");
    migrator
        .run(pool)
        .await
        .with_context(|| format!("Failed to run migrations for {}", name))?;
    info!(database = name, "Database migrations completed");
    Ok(())
}

/// Run the migrations of every domain database
pub async fn run_migrations(pools: &DbPools) -> Result<()> {
    migrate("pan_db", &PAN_MIGRATOR, &pools.pan).await?;
    migrate("aadhaar_db", &AADHAAR_MIGRATOR, &pools.aadhaar).await?;
    migrate("kyc_db", &KYC_MIGRATOR, &pools.kyc).await?;
    Ok(())
}
