//! Metrics collection and exposition.
//!
//! # Metrics
//! - `webcore_requests_total` (counter): requests by method, status, route
//! - `webcore_request_duration_seconds` (histogram): latency distribution
//! - `webcore_registrations_total` (counter): registry writes by registry
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    metrics::counter!("webcore_requests_total", &labels).increment(1);
    metrics::histogram!("webcore_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_registration(registry: &'static str) {
    metrics::counter!("webcore_registrations_total", "registry" => registry).increment(1);
}
