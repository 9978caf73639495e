//! Health Check Endpoints
//! Handlers for /health, /health/live, /health/ready, /metrics; these mount
//! on the main application router rather than a separate port.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::instrument;

use crate::orders::OrderStore;

use super::metrics::encode_metrics;

#[derive(Clone)]
pub struct HealthState {
    pub store: Arc<OrderStore>,
    pub ready: Arc<AtomicBool>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
    orders_in_store: usize,
}

static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Record process start for uptime reporting
pub fn mark_start_time() {
    START_TIME.get_or_init(std::time::Instant::now);
}

#[instrument(skip(state))]
pub async fn health_check(State(state): State<HealthState>) -> impl IntoResponse {
    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        orders_in_store: state.store.len().await,
    };

    (StatusCode::OK, Json(response))
}

pub async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "alive" })))
}

#[instrument(skip(state))]
pub async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
    if state.ready.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(serde_json::json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "not_ready", "reason": "initializing" })),
        )
    }
}

pub async fn prometheus_metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        encode_metrics(),
    )
}
