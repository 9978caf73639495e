//! API Tests - status mapping and wire shapes over the full router

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use orders_core::http::{build_router, AppState, ErrorBody};
use orders_core::observability::health::HealthState;
use orders_core::orders::{Order, OrderPage, OrderService, OrderStatus, OrderStore};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_app() -> Router {
    let store = Arc::new(OrderStore::new());
    let service = Arc::new(OrderService::new(store.clone(), Duration::ZERO));
    build_router(AppState {
        service,
        health: HealthState {
            store,
            ready: Arc::new(AtomicBool::new(true)),
        },
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_order_returns_201() {
    let app = test_app();

    let resp = app
        .oneshot(post_json(
            "/orders",
            serde_json::json!({ "item": "widget", "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Order = read_json(resp).await;
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.quantity, 2);
    assert_eq!(order.id.len(), 8);
    assert!(order.completed_at.is_none());
}

#[tokio::test]
async fn test_create_order_quantity_defaults_to_one() {
    let app = test_app();

    let resp = app
        .oneshot(post_json("/orders", serde_json::json!({ "item": "gadget" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let order: Order = read_json(resp).await;
    assert_eq!(order.quantity, 1);
}

#[tokio::test]
async fn test_create_order_invalid_quantity_is_400() {
    let app = test_app();

    let resp = app
        .oneshot(post_json(
            "/orders",
            serde_json::json!({ "item": "widget", "quantity": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = read_json(resp).await;
    assert_eq!(body.error, "validation");
    assert!(body.message.contains("quantity"));
}

#[tokio::test]
async fn test_get_missing_order_is_404() {
    let app = test_app();

    let resp = app.oneshot(get("/orders/does-not-exist")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorBody = read_json(resp).await;
    assert_eq!(body.error, "not_found");
}

#[tokio::test]
async fn test_complete_missing_order_is_404() {
    let app = test_app();

    let resp = app
        .oneshot(post_empty("/orders/ghost/complete"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorBody = read_json(resp).await;
    assert_eq!(body.error, "not_found");
}

#[tokio::test]
async fn test_list_defaults_to_ten() {
    let app = test_app();

    for i in 0..12 {
        let resp = app
            .clone()
            .oneshot(post_json(
                "/orders",
                serde_json::json!({ "item": format!("item-{i}"), "quantity": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = app.oneshot(get("/orders")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let page: OrderPage = read_json(resp).await;
    assert_eq!(page.count, 10);
    assert_eq!(page.orders.last().unwrap().item, "item-11");
}

#[tokio::test]
async fn test_list_respects_limit_param() {
    let app = test_app();

    for _ in 0..5 {
        app.clone()
            .oneshot(post_json(
                "/orders",
                serde_json::json!({ "item": "widget", "quantity": 1 }),
            ))
            .await
            .unwrap();
    }

    let resp = app.oneshot(get("/orders?limit=3")).await.unwrap();
    let page: OrderPage = read_json(resp).await;
    assert_eq!(page.count, 3);
}

// The end-to-end lifecycle: create, fetch, complete, then a guaranteed miss
#[tokio::test]
async fn test_full_order_lifecycle() {
    let app = test_app();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/orders",
            serde_json::json!({ "item": "widget", "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Order = read_json(resp).await;
    assert_eq!(created.status, OrderStatus::Created);
    assert_eq!(created.quantity, 2);

    let resp = app
        .clone()
        .oneshot(get(&format!("/orders/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Order = read_json(resp).await;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.quantity, 2);

    let resp = app
        .clone()
        .oneshot(post_empty(&format!("/orders/{}/complete", created.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let completed: Order = read_json(resp).await;
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(completed.completed_at.is_some());

    let resp = app.oneshot(get("/orders/does-not-exist")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app();

    let resp = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get("/health/live")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(get("/health/ready")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_reflects_flag() {
    let store = Arc::new(OrderStore::new());
    let service = Arc::new(OrderService::new(store.clone(), Duration::ZERO));
    let app = build_router(AppState {
        service,
        health: HealthState {
            store,
            ready: Arc::new(AtomicBool::new(false)),
        },
    });

    let resp = app.oneshot(get("/health/ready")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let app = test_app();

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}
