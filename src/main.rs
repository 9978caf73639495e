//! Orders Core - Instrumented Orders API
//! Correlated OTLP tracing and structured logging around a minimal
//! in-memory order lifecycle

use orders_core::config::Config;
use orders_core::http::{build_router, AppState};
use orders_core::observability::{
    self,
    health::{self, HealthState},
};
use orders_core::orders::{OrderService, OrderStore};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize observability (tracing, logs, metrics)
    let telemetry = observability::init_observability(&config)?;
    health::mark_start_time();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Orders Core..."
    );

    // Readiness flips once the listener is bound
    let ready = Arc::new(AtomicBool::new(false));

    let store = Arc::new(OrderStore::new());
    let service = Arc::new(OrderService::new(store.clone(), config.persist_delay()));
    info!(
        persist_delay_ms = config.persist_delay_ms,
        "Order service initialized"
    );

    let state = AppState {
        service,
        health: HealthState {
            store,
            ready: ready.clone(),
        },
    };
    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    ready.store(true, Ordering::Relaxed);
    info!(addr = %config.bind_addr, "Orders API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush telemetry before exit
    telemetry.shutdown();
    info!("Orders Core stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Received shutdown signal");
}
