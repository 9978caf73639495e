//! Prometheus Metrics for the Orders Service
//! Counters for order outcomes plus per-operation latency histograms

use once_cell::sync::Lazy;
use prometheus::{Counter, Encoder, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Mutex;

/// Global metrics registry
static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Application metrics
pub struct Metrics {
    pub orders_created_total: Counter,
    pub orders_rejected_total: Counter,
    pub orders_completed_total: Counter,
    pub lookups_failed_total: Counter,
    pub operation_duration: HistogramVec,
}

static METRICS: Lazy<Mutex<Option<Metrics>>> = Lazy::new(|| Mutex::new(None));

/// Initialize metrics
pub fn init_metrics(service_name: &str) -> anyhow::Result<()> {
    let orders_created_total = Counter::with_opts(
        Opts::new("orders_created_total", "Orders validated and persisted")
            .const_label("service", service_name),
    )?;

    let orders_rejected_total = Counter::with_opts(
        Opts::new("orders_rejected_total", "Orders rejected at validation")
            .const_label("service", service_name),
    )?;

    let orders_completed_total = Counter::with_opts(
        Opts::new("orders_completed_total", "Orders transitioned to completed")
            .const_label("service", service_name),
    )?;

    let lookups_failed_total = Counter::with_opts(
        Opts::new("order_lookups_failed_total", "Lookups for ids not in the store")
            .const_label("service", service_name),
    )?;

    let operation_duration = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "order_operation_duration_seconds",
            "Order operation latency in seconds",
        )
        .const_label("service", service_name)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["operation"],
    )?;

    // Register all metrics
    REGISTRY.register(Box::new(orders_created_total.clone()))?;
    REGISTRY.register(Box::new(orders_rejected_total.clone()))?;
    REGISTRY.register(Box::new(orders_completed_total.clone()))?;
    REGISTRY.register(Box::new(lookups_failed_total.clone()))?;
    REGISTRY.register(Box::new(operation_duration.clone()))?;

    let metrics = Metrics {
        orders_created_total,
        orders_rejected_total,
        orders_completed_total,
        lookups_failed_total,
        operation_duration,
    };

    let mut guard = METRICS.lock().unwrap();
    *guard = Some(metrics);

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Get metrics instance; None until init_metrics has run
pub fn get_metrics() -> std::sync::MutexGuard<'static, Option<Metrics>> {
    METRICS.lock().unwrap()
}

/// Start a latency timer for one service operation; observes on drop
pub fn operation_timer(operation: &str) -> Option<prometheus::HistogramTimer> {
    get_metrics().as_ref().map(|m| {
        m.operation_duration
            .with_label_values(&[operation])
            .start_timer()
    })
}

/// Encode metrics to Prometheus text format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap_or_default();
    String::from_utf8(buffer).unwrap_or_default()
}
