//! Configuration Module
//! Loads settings from environment variables, fixed for the process lifetime

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    pub otlp_endpoint: String,
    pub environment: String,
    pub bind_addr: String,
    pub persist_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "orders-core".to_string()),
            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            persist_delay_ms: env::var("PERSIST_DELAY_MS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
        })
    }

    /// Simulated work applied while persisting an order.
    pub fn persist_delay(&self) -> Duration {
        Duration::from_millis(self.persist_delay_ms)
    }
}
