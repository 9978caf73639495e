//! HTTP API - order endpoints plus health and metrics routes
//! Handlers stay thin; spans for the order lifecycle are opened by the
//! service layer so the trace shape is identical regardless of transport.

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::observability::health::{self, HealthState};
use crate::orders::{CreateOrder, Order, OrderError, OrderPage, OrderService};

/// Default page size for GET /orders
const DEFAULT_LIST_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
    pub health: HealthState,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(state: &AppState) -> Self {
        state.health.clone()
    }
}

/// Wire shape for every API error
#[derive(Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let (status, class) = match &self {
            OrderError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, "validation"),
            OrderError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        };
        let body = ErrorBody {
            error: class.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/complete", post(complete_order))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(health::prometheus_metrics))
        .with_state(state)
}

async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), OrderError> {
    let order = state.service.create_order(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<OrderPage> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Json(state.service.list_orders(limit).await)
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, OrderError> {
    let order = state.service.get_order(&id).await?;
    Ok(Json(order))
}

async fn complete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, OrderError> {
    let order = state.service.complete_order(&id).await?;
    Ok(Json(order))
}
