//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::repository::DbPools;

/// Interval at which connection pool gauges are refreshed
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(15);

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // Request latency buckets in seconds, down to 1 ms for cached lookups.
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("Failed to set histogram buckets")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Register metric descriptions and emit zero values so `/metrics` lists
/// every series from startup, not only after first use.
pub fn describe_metrics() {
    // HTTP
    describe_counter!("kyc_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "kyc_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "kyc_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Link lifecycle
    describe_counter!(
        "kyc_link_requests_total",
        "Link request transitions by domain and result"
    );
    describe_counter!(
        "kyc_otp_verifications_total",
        "OTP verification outcomes by domain"
    );

    // Database pools
    describe_gauge!(
        "kyc_db_pool_connections_active",
        "Number of active database connections per domain database"
    );
    describe_gauge!(
        "kyc_db_pool_connections_idle",
        "Number of idle database connections per domain database"
    );

    for domain in ["pan", "aadhaar"] {
        counter!("kyc_link_requests_total", "domain" => domain, "result" => "created").absolute(0);
        counter!("kyc_otp_verifications_total", "domain" => domain, "result" => "verified")
            .absolute(0);
    }
    gauge!("kyc_http_requests_in_flight").set(0.0);
}

/// Periodically publish pool occupancy for each domain database
pub fn spawn_pool_metrics(pools: DbPools) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POOL_METRICS_INTERVAL);
        loop {
            ticker.tick().await;
            for (name, pool) in pools.named() {
                let idle = pool.num_idle() as f64;
                let active = pool.size() as f64 - idle;
                gauge!("kyc_db_pool_connections_active", "database" => name).set(active);
                gauge!("kyc_db_pool_connections_idle", "database" => name).set(idle);
            }
        }
    })
}
