//! Prometheus metrics for the screener.
//!
//! Counters for analysis cycles, symbols, notifications and risk-model
//! fallbacks. Recording is a no-op until [`init_metrics`] installs the
//! exporter, so library code and tests can call the helpers freely.

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Histogram buckets for cycle durations (in seconds).
const CYCLE_BUCKETS: [f64; 8] = [1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0];

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(port: u16) -> Result<(), MetricsError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets(&CYCLE_BUCKETS)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(addr = %addr, "Prometheus metrics exporter started");
    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Analysis Metrics
// ============================================================================

/// Record a symbol that produced a report.
pub fn record_symbol_analyzed(symbol: &str) {
    counter!("screener_symbols_analyzed_total", "symbol" => symbol.to_string()).increment(1);
}

/// Record a symbol whose analysis failed.
pub fn record_symbol_failed(symbol: &str) {
    counter!("screener_symbols_failed_total", "symbol" => symbol.to_string()).increment(1);
}

/// Record an assignment probability computed by the distance heuristic.
pub fn record_risk_fallback() {
    counter!("screener_risk_fallbacks_total").increment(1);
}

// ============================================================================
// Notification Metrics
// ============================================================================

/// Record the delivery result of one message on one channel.
pub fn record_notification(channel: &str, delivered: bool) {
    let status = if delivered { "delivered" } else { "failed" };
    counter!(
        "screener_notifications_total",
        "channel" => channel.to_string(),
        "status" => status
    )
    .increment(1);
}

// ============================================================================
// Scheduler Metrics
// ============================================================================

/// Record a finished cycle.
///
/// # Arguments
///
/// * `outcome` - "completed", "timed_out", "panicked" or "skipped"
/// * `duration_seconds` - Wall time until the outcome was known
pub fn record_cycle(outcome: &str, duration_seconds: f64) {
    counter!("screener_cycles_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("screener_cycle_duration_seconds").record(duration_seconds);
}
