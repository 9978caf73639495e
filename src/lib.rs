//! Instrumented orders demo: a small stateful orders API wired for
//! correlated distributed tracing and structured logging over OTLP,
//! plus a synthetic traffic driver that keeps the telemetry interesting.

pub mod config;
pub mod driver;
pub mod http;
pub mod observability;
pub mod orders;
