//! Observability: structured logging and Prometheus metrics.

mod logging;
mod metrics;

pub use logging::{LOG_FORMATS, LoggingError, build_filter, init_tracing};
pub use metrics::{
    MetricsError, init_metrics, record_cycle, record_notification, record_risk_fallback,
    record_symbol_analyzed, record_symbol_failed,
};
