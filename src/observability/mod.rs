//! Observability Module - OpenTelemetry Tracing, Structured Logging, Metrics
//! Spans and logs share trace/span ids so a backend can join them per request

pub mod health;
pub mod metrics;
pub mod tracing_setup;

use crate::config::Config;

use opentelemetry::global;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Handle to the process-wide telemetry stack. Constructed once in main and
/// shut down explicitly so batched spans and log records flush before exit.
pub struct Telemetry {
    _priv: (),
}

impl Telemetry {
    /// Graceful shutdown; flushes buffered spans and log records
    pub fn shutdown(self) {
        tracing::info!("Shutting down observability...");
        global::shutdown_logger_provider();
        global::shutdown_tracer_provider();
    }
}

/// Initialize complete observability stack
pub fn init_observability(config: &Config) -> anyhow::Result<Telemetry> {
    // Span and log pipelines export independently to the same collector
    let tracer = tracing_setup::init_tracer(config)?;
    tracing_setup::init_logger(config)?;

    // Initialize metrics
    metrics::init_metrics(&config.service_name)?;

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,orders_core=debug"));

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true);

    // The gRPC exporter stack logs through tracing as well; mute it on the
    // bridge layer so each export batch cannot emit records that feed the
    // next batch.
    let bridge_filter = Targets::new()
        .with_default(LevelFilter::INFO)
        .with_target("h2", LevelFilter::OFF)
        .with_target("hyper", LevelFilter::OFF)
        .with_target("tonic", LevelFilter::OFF)
        .with_target("tower", LevelFilter::OFF)
        .with_target("opentelemetry", LevelFilter::OFF)
        .with_target("opentelemetry_sdk", LevelFilter::OFF);
    let logger_provider = global::logger_provider();
    let bridge_layer =
        OpenTelemetryTracingBridge::new(&logger_provider).with_filter(bridge_filter);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(telemetry_layer)
        .with(bridge_layer)
        .init();

    tracing::info!(
        service = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        "Observability stack initialized"
    );

    Ok(Telemetry { _priv: () })
}
