//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devproxy_requests_total` (counter): requests by method, status, route
//! - `devproxy_request_duration_seconds` (histogram): latency distribution
//!
//! Recording is a no-op until a recorder is installed, so handlers always
//! record and only `init_metrics` decides whether anything is exported.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Route label for requests served without proxying.
pub const LOCAL_ROUTE: &str = "local";

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];

    metrics::counter!("devproxy_requests_total", &labels).increment(1);
    metrics::histogram!("devproxy_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}
