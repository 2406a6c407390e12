//! HTTP observability middleware
//!
//! A Tower Layer/Service that propagates `x-request-id` and records the
//! request counter, latency histogram and in-flight gauge.

use axum::{body::Body, http::Request, response::Response};
use metrics::{counter, gauge, histogram};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Tower Layer for HTTP observability (request ID + metrics).
#[derive(Clone)]
pub struct ObservabilityLayer;

impl<S> Layer<S> for ObservabilityLayer {
    type Service = ObservabilityMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ObservabilityMiddleware { inner }
    }
}

/// Tower Service that records HTTP metrics and propagates request IDs.
#[derive(Clone)]
pub struct ObservabilityMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for ObservabilityMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let method = request.method().clone().to_string();
        let path = normalize_path(request.uri().path());

        // Extract or generate request ID
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        gauge!("kyc_http_requests_in_flight").increment(1.0);
        let start = Instant::now();

        let mut inner = self.inner.clone();
        let span = tracing::info_span!("request", request_id = %request_id);

        Box::pin(
            async move {
                let response = inner.call(request).await?;

                let duration = start.elapsed().as_secs_f64();
                let status = response.status().as_u16().to_string();

                counter!("kyc_http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
                    .increment(1);
                histogram!("kyc_http_request_duration_seconds", "method" => method, "path" => path)
                    .record(duration);
                gauge!("kyc_http_requests_in_flight").decrement(1.0);

                // Echo request ID in response headers
                let mut response = response;
                if let Ok(val) = request_id.parse() {
                    response.headers_mut().insert("x-request-id", val);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// Collapse identifier path segments to `{id}` to keep label cardinality bounded.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| {
            if looks_like_identifier(seg) {
                "{id}"
            } else {
                seg
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Identifier prefixes issued by the gateway
const ID_PREFIXES: &[&str] = &["PAN_", "ADR_", "sess_", "doc_"];

fn looks_like_identifier(s: &str) -> bool {
    let prefixed = ID_PREFIXES
        .iter()
        .any(|p| s.len() > p.len() && s.starts_with(p));
    prefixed || looks_like_uuid(s)
}

fn looks_like_uuid(s: &str) -> bool {
    s.len() == 36 && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}
