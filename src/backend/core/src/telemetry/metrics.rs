//! Prometheus metrics for inventory activity and errors.
//!
//! The recorder is installed once per process; every `counter!`/`histogram!`
//! call elsewhere in the crate is a no-op until then, so library users and
//! tests that never call [`init_metrics`] pay nothing.
//!
//! # Example
//!
//! ```rust,no_run
//! use inkledger_core::telemetry::metrics::InventoryMetrics;
//!
//! InventoryMetrics::event_recorded("REFILL");
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

/// Global Prometheus handle, set by [`init_metrics`].
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Whether metrics collection is enabled
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,

    /// Histogram buckets for durations (in seconds)
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            duration_buckets: default_duration_buckets(),
        }
    }
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_duration_buckets() -> Vec<f64> {
    vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
}

/// Access to the installed Prometheus recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRegistry;

impl MetricsRegistry {
    /// Get the global metrics registry.
    pub fn global() -> MetricsRegistry {
        MetricsRegistry
    }

    /// Whether a recorder has been installed.
    pub fn is_installed(&self) -> bool {
        PROMETHEUS_HANDLE.get().is_some()
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        PROMETHEUS_HANDLE
            .get()
            .map(|h| h.render())
            .unwrap_or_default()
    }
}

/// Install the Prometheus recorder.
///
/// Calling this more than once is harmless: later calls keep the first
/// recorder and return the same registry.
pub fn init_metrics(config: &MetricsConfig, service_name: &str) -> anyhow::Result<MetricsRegistry> {
    if !config.enabled || PROMETHEUS_HANDLE.get().is_some() {
        return Ok(MetricsRegistry);
    }

    let handle = PrometheusBuilder::new()
        .add_global_label("service", service_name)
        .set_buckets(&config.duration_buckets)?
        .install_recorder()?;

    register_metric_descriptions();

    let _ = PROMETHEUS_HANDLE.set(handle);

    tracing::info!(service_name = %service_name, "Metrics initialized");

    Ok(MetricsRegistry)
}

fn register_metric_descriptions() {
    describe_counter!(
        "inkledger_events_recorded_total",
        "Lifecycle events recorded, by kind"
    );
    describe_counter!("inkledger_units_created_total", "Ink units registered");
    describe_counter!(
        "inkledger_units_deleted_total",
        "Ink units deleted together with their history"
    );
    describe_counter!("inkledger_errors_total", "Errors by code and category");
    describe_histogram!(
        "inkledger_dashboard_build_seconds",
        "Time spent rebuilding the dashboard from the event log"
    );
}

/// Business metrics for the inventory.
pub struct InventoryMetrics;

impl InventoryMetrics {
    pub fn event_recorded(kind: &str) {
        counter!("inkledger_events_recorded_total", "kind" => kind.to_string()).increment(1);
    }

    pub fn unit_created() {
        counter!("inkledger_units_created_total").increment(1);
    }

    pub fn unit_deleted(events_removed: u64) {
        counter!("inkledger_units_deleted_total").increment(1);
        tracing::trace!(events_removed, "unit deletion metered");
    }

    pub fn dashboard_built(elapsed: Duration, units: usize) {
        histogram!("inkledger_dashboard_build_seconds").record(elapsed.as_secs_f64());
        tracing::trace!(units, elapsed_ms = elapsed.as_millis() as u64, "dashboard metered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_defaults() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert!(!config.duration_buckets.is_empty());
        assert!(config.duration_buckets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_disabled_metrics_do_not_install() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        let registry = init_metrics(&config, "inkledger-test").unwrap();
        if !registry.is_installed() {
            assert!(registry.render().is_empty());
        }
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        InventoryMetrics::event_recorded("INSTALL");
        InventoryMetrics::unit_created();
        InventoryMetrics::unit_deleted(3);
        InventoryMetrics::dashboard_built(Duration::from_millis(2), 4);
    }
}
