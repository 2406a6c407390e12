//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::domain::LinkDomain;
use crate::error::AppError;
use crate::jwt::JwtManager;
use crate::middleware::{
    normalize_error_response, require_auth_middleware, AuthMiddlewareState, ObservabilityLayer,
    SanitizedMakeSpan,
};
use crate::migration;
use crate::otp::{LogOtpSender, OtpSender};
use crate::repository::{
    AadhaarLinkRequestRepositoryImpl, DbPools, KycRepositoryImpl, PanLinkRequestRepositoryImpl,
};
use crate::service::{AadhaarService, KycService, LinkService, OtpPolicy, PanService};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    http::{StatusCode, Uri},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pools: DbPools,
    pub pan_service: Arc<PanService<PanLinkRequestRepositoryImpl>>,
    pub aadhaar_service: Arc<AadhaarService<AadhaarLinkRequestRepositoryImpl>>,
    pub kyc_service: Arc<KycService<KycRepositoryImpl>>,
    pub jwt_manager: JwtManager,
}

impl AppState {
    /// Wire repositories and services over the per-domain pools
    pub fn new(config: Config, pools: DbPools, otp_sender: Arc<dyn OtpSender>) -> Self {
        let policy = OtpPolicy {
            hmac_key: Arc::from(config.jwt.secret.as_bytes()),
            ttl_secs: config.otp.ttl_secs,
            max_attempts: config.otp.max_attempts,
        };

        let pan_service = Arc::new(PanService::new(LinkService::new(
            LinkDomain::Pan,
            Arc::new(PanLinkRequestRepositoryImpl::new(pools.pan.clone())),
            otp_sender.clone(),
            policy.clone(),
        )));
        let aadhaar_service = Arc::new(AadhaarService::new(LinkService::new(
            LinkDomain::Aadhaar,
            Arc::new(AadhaarLinkRequestRepositoryImpl::new(pools.aadhaar.clone())),
            otp_sender,
            policy,
        )));
        let kyc_service = Arc::new(KycService::new(Arc::new(KycRepositoryImpl::new(
            pools.kyc.clone(),
        ))));

        Self {
            jwt_manager: JwtManager::new(config.jwt.clone()),
            config: Arc::new(config),
            pools,
            pan_service,
            aadhaar_service,
            kyc_service,
        }
    }
}

impl HasServices for AppState {
    type PanRepo = PanLinkRequestRepositoryImpl;
    type AadhaarRepo = AadhaarLinkRequestRepositoryImpl;
    type KycRepo = KycRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn pan_service(&self) -> &PanService<Self::PanRepo> {
        &self.pan_service
    }

    fn aadhaar_service(&self) -> &AadhaarService<Self::AadhaarRepo> {
        &self.aadhaar_service
    }

    fn kyc_service(&self) -> &KycService<Self::KycRepo> {
        &self.kyc_service
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn check_ready(&self) -> impl Future<Output = bool> + Send {
        let pools = self.pools.clone();
        async move { pools.ping().await.is_ok() }
    }
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let pools = DbPools::connect_lazy(&config.database)?;

    if config.run_migrations {
        migration::run_migrations(&pools).await?;
    }
    if prometheus_handle.is_some() {
        crate::telemetry::metrics::spawn_pool_metrics(pools.clone());
    }

    let http_addr = config.http_addr();
    if config.jwt.dev_login_enabled {
        tracing::warn!("Development /login endpoint is enabled");
    }

    let state = AppState::new(config, pools.clone(), Arc::new(LogOtpSender));
    let app = build_router(state, prometheus_handle);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pools.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Build the HTTP router with generic state type
///
/// Generic over the state so the HTTP tests drive the production routes
/// with in-memory repositories.
pub fn build_router<S: HasServices>(
    state: S,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let timeout = Duration::from_secs(state.config().request_timeout_secs);
    let auth_state = AuthMiddlewareState::new(state.jwt_manager().clone());
    let docs_enabled = !state.config().is_production();

    let v1 = Router::new()
        // PAN
        .route("/v1/pan/link-requests", post(api::pan::start::<S>))
        .route(
            "/v1/pan/link-requests/{request_id}",
            get(api::pan::status::<S>),
        )
        .route(
            "/v1/pan/link-requests/{request_id}/send-otp",
            post(api::pan::send_otp::<S>),
        )
        .route(
            "/v1/pan/link-requests/{request_id}/verify-otp",
            post(api::pan::verify_otp::<S>),
        )
        .route(
            "/v1/pan/link-requests/{request_id}/finalize",
            post(api::pan::finalize::<S>),
        )
        // Aadhaar
        .route("/v1/aadhaar/link-requests", post(api::aadhaar::start::<S>))
        .route(
            "/v1/aadhaar/link-requests/{request_id}",
            get(api::aadhaar::status::<S>),
        )
        .route(
            "/v1/aadhaar/link-requests/{request_id}/send-otp",
            post(api::aadhaar::send_otp::<S>),
        )
        .route(
            "/v1/aadhaar/link-requests/{request_id}/verify-otp",
            post(api::aadhaar::verify_otp::<S>),
        )
        .route(
            "/v1/aadhaar/link-requests/{request_id}/finalize",
            post(api::aadhaar::finalize::<S>),
        )
        // KYC onboarding
        .route("/v1/kyc/sessions", post(api::kyc::create_session::<S>))
        .route(
            "/v1/kyc/sessions/{session_id}/documents",
            post(api::kyc::add_document::<S>),
        )
        .route(
            "/v1/kyc/sessions/{session_id}/summary",
            get(api::kyc::summary::<S>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_auth_middleware,
        ));

    let mut public = Router::new()
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route("/login", post(api::auth::login::<S>));

    if docs_enabled {
        public = public
            .route(api::docs::OPENAPI_JSON_PATH, get(api::docs::openapi_json))
            .route("/swagger-ui", get(api::docs::swagger_ui));
    }

    let metrics = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(prometheus_handle));

    public
        .merge(v1)
        .fallback(not_found)
        .with_state(state)
        .merge(metrics)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        // Outside the timeout so its 408 is rewritten to JSON as well
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(ObservabilityLayer)
}
