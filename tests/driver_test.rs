//! Traffic Driver Tests
//! Cycle plan bounds, full runs against an in-process API, and stop handling

use orders_core::driver::{self, plan_cycle, DriverConfig, DriverError, ITEMS};
use orders_core::http::{build_router, AppState};
use orders_core::observability::health::HealthState;
use orders_core::orders::{OrderService, OrderStore};
use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

async fn spawn_api() -> SocketAddr {
    let store = Arc::new(OrderStore::new());
    let service = Arc::new(OrderService::new(store.clone(), Duration::ZERO));
    let app = build_router(AppState {
        service,
        health: HealthState {
            store,
            ready: Arc::new(AtomicBool::new(true)),
        },
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn driver_config(addr: SocketAddr, count: Option<u64>, interval: Duration) -> DriverConfig {
    DriverConfig {
        base_url: format!("http://{addr}"),
        count,
        interval,
        verbose: false,
    }
}

#[test]
fn test_cycle_plan_stays_within_bounds() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..200 {
        let plan = plan_cycle(&mut rng);
        assert!((1..=3).contains(&plan.creates.len()));
        assert!((1..=2).contains(&plan.lists));
        assert!((2..=3).contains(&plan.gets));
        for (item, quantity) in &plan.creates {
            assert!(ITEMS.contains(item));
            assert!((1..=5).contains(quantity));
        }
    }
}

#[tokio::test]
async fn test_run_completes_exact_cycle_count() {
    let addr = spawn_api().await;
    let (_tx, rx) = watch::channel(false);

    let config = driver_config(addr, Some(3), Duration::from_millis(10));
    let cycles = driver::run(config, rx).await.unwrap();
    assert_eq!(cycles, 3);
}

#[tokio::test]
async fn test_loop_mode_stops_before_first_cycle_when_flag_raised() {
    let addr = spawn_api().await;
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let config = driver_config(addr, None, Duration::from_millis(10));
    let cycles = driver::run(config, rx).await.unwrap();
    assert_eq!(cycles, 0);
}

#[tokio::test]
async fn test_stop_during_pause_skips_remaining_interval() {
    let addr = spawn_api().await;
    let (tx, rx) = watch::channel(false);

    // Long interval; the stop signal should cut the pause short
    let config = driver_config(addr, None, Duration::from_secs(30));
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(true).unwrap();
        std::future::pending::<()>().await
    });

    let start = Instant::now();
    let cycles = driver::run(config, rx).await.unwrap();
    assert_eq!(cycles, 1);
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let (_tx, rx) = watch::channel(false);

    let config = DriverConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        count: Some(1),
        interval: Duration::from_millis(10),
        verbose: false,
    };
    let err = driver::run(config, rx).await.unwrap_err();
    assert!(matches!(err, DriverError::Transport(_)));
}
