use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kyc_gateway::{
    config::{Config, TelemetryConfig},
    migration,
    repository::DbPools,
    server, telemetry,
};
use tracing::info;

/// KYC verification gateway for PAN and Aadhaar linking and KYC onboarding
#[derive(Parser, Debug)]
#[command(name = "kyc-gateway", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the HTTP gateway (default)
    Serve,
    /// Create the tables of every domain database and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let prometheus_handle = telemetry::init(&TelemetryConfig::from_env())?;
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting KYC Gateway ({})", config.environment);
            server::run(config, prometheus_handle).await
        }
        Command::Migrate => {
            let pools = DbPools::connect_lazy(&config.database)?;
            migration::run_migrations(&pools).await?;
            pools.close().await;
            Ok(())
        }
    }
}
