//! Metrics collection and Prometheus export.
//!
//! Installs the exporter and renders the `/metrics` body. Recording works
//! without an installed recorder; the samples are then discarded.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!("Failed to install Prometheus recorder: {}", e),
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_resource_created(collection: &'static str) {
    counter!("site_resources_created_total", "collection" => collection).increment(1);
}

pub fn record_records_dropped(collection: &'static str, count: usize) {
    if count > 0 {
        counter!("site_records_dropped_total", "collection" => collection).increment(count as u64);
    }
}
