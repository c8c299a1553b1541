//! Telemetry: structured logging and Prometheus metrics.
//!
//! # Example
//!
//! ```rust,no_run
//! use inkledger_core::telemetry::{init_telemetry, LoggingConfig, MetricsConfig};
//!
//! init_telemetry(&LoggingConfig::default(), &MetricsConfig::default())
//!     .expect("Failed to initialize telemetry");
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{init_metrics, InventoryMetrics, MetricsConfig, MetricsRegistry};

/// Service name attached to every metric.
pub const SERVICE_NAME: &str = "inkledger";

/// Initialize logging and metrics. Call once at startup.
pub fn init_telemetry(
    logging: &LoggingConfig,
    metrics: &MetricsConfig,
) -> anyhow::Result<MetricsRegistry> {
    let registry = init_metrics(metrics, SERVICE_NAME)?;
    init_logging(logging)?;
    Ok(registry)
}
