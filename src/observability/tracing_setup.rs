//! OpenTelemetry Pipeline Configuration
//! Spans and log records export over OTLP/gRPC on separate batch pipelines

use crate::config::Config;

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{logs as sdklogs, runtime, trace as sdktrace, Resource};

fn telemetry_resource(config: &Config) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ])
}

/// Initialize OpenTelemetry tracer with OTLP exporter
pub fn init_tracer(config: &Config) -> anyhow::Result<sdktrace::Tracer> {
    // Sample 10% in production, everything elsewhere
    let sampler = if config.environment == "production" {
        sdktrace::Sampler::ParentBased(Box::new(sdktrace::Sampler::TraceIdRatioBased(0.1)))
    } else {
        sdktrace::Sampler::AlwaysOn
    };

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(&config.otlp_endpoint);

    // install_batch registers the global tracer provider and hands back a tracer
    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(
            sdktrace::Config::default()
                .with_sampler(sampler)
                .with_id_generator(sdktrace::RandomIdGenerator::default())
                .with_max_events_per_span(64)
                .with_max_attributes_per_span(32)
                .with_max_links_per_span(32)
                .with_resource(telemetry_resource(config)),
        )
        .install_batch(runtime::Tokio)?;

    Ok(tracer)
}

/// Initialize the OTLP log pipeline; the returned logger is unused directly,
/// log records reach it through the tracing bridge layer.
pub fn init_logger(config: &Config) -> anyhow::Result<sdklogs::Logger> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(&config.otlp_endpoint);

    let logger = opentelemetry_otlp::new_pipeline()
        .logging()
        .with_log_config(sdklogs::Config::default().with_resource(telemetry_resource(config)))
        .with_exporter(exporter)
        .install_batch(runtime::Tokio)?;

    Ok(logger)
}
