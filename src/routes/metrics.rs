//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize metrics (call once at startup)
pub fn init_metrics() -> anyhow::Result<()> {
    PROMETHEUS_HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder())?;
    register_metrics();
    Ok(())
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "cinegate_cache_operations_total",
        "Gateway cache lookups by result (hit, miss, error)"
    );
    metrics::describe_gauge!(
        "cinegate_cache_entries",
        "Number of payloads currently held by the gateway cache"
    );
    metrics::describe_counter!(
        "cinegate_upstream_requests_total",
        "Outbound requests to the metadata provider by status"
    );
    metrics::describe_histogram!(
        "cinegate_upstream_duration_seconds",
        "Outbound request duration in seconds"
    );
    metrics::describe_counter!(
        "cinegate_auth_failures_total",
        "Requests rejected for invalid or missing credentials"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Record a gateway cache lookup
pub fn record_cache_operation(result: &'static str) {
    metrics::counter!("cinegate_cache_operations_total", "result" => result).increment(1);
}

/// Update the cache size gauge
pub fn set_cache_entries(count: usize) {
    metrics::gauge!("cinegate_cache_entries").set(count as f64);
}

/// Record an outbound provider request
pub fn record_upstream_request(status: &str, duration_secs: f64) {
    metrics::counter!("cinegate_upstream_requests_total", "status" => status.to_string())
        .increment(1);
    metrics::histogram!("cinegate_upstream_duration_seconds").record(duration_secs);
}

pub fn record_auth_failure() {
    metrics::counter!("cinegate_auth_failures_total").increment(1);
}
