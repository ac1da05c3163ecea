//! Metrics collection and exposition.
//!
//! # Metrics
//! - `directory_upstream_attempts_total` (counter): attempts by operation, outcome
//! - `directory_upstream_retries_total` (counter): scheduled retries by operation
//! - `directory_cache_lookups_total` (counter): view lookups by view, result
//! - `directory_cache_invalidations_total` (counter)
//! - `directory_requests_total` (counter): inbound requests by method, status
//! - `directory_request_duration_seconds` (histogram)

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_upstream_attempt(operation: &'static str, outcome: &'static str) {
    ::metrics::counter!(
        "directory_upstream_attempts_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_upstream_retry(operation: &'static str) {
    ::metrics::counter!("directory_upstream_retries_total", "operation" => operation).increment(1);
}

pub fn record_cache_lookup(view: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    ::metrics::counter!("directory_cache_lookups_total", "view" => view, "result" => result)
        .increment(1);
}

pub fn record_cache_invalidation() {
    ::metrics::counter!("directory_cache_invalidations_total").increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "directory_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("directory_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
