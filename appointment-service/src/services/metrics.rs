//! Prometheus metrics for appointment-service.
//!
//! HTTP request metrics come from the `metrics` facade (recorded by the
//! service-core middleware and exported through `metrics-exporter-prometheus`);
//! store and operation metrics are plain `prometheus` statics.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Store query duration histogram by operation.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "appointment_db_query_duration_seconds",
        "Store query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Appointment operations by operation and outcome.
pub static APPOINTMENT_OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "appointment_operations_total",
        "Total number of appointment operations",
        &["operation", "status"]
    )
    .expect("Failed to register APPOINTMENT_OPERATIONS")
});

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&APPOINTMENT_OPERATIONS);

    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            // Lost races leave the first handle in place.
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed; HTTP metrics disabled");
        }
    }
}

/// Get all metrics as Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode prometheus metrics");
    }
    output.push_str(&String::from_utf8_lossy(&buffer));

    output
}

/// Record an appointment operation outcome.
pub fn record_operation(operation: &str, status: &str) {
    APPOINTMENT_OPERATIONS
        .with_label_values(&[operation, status])
        .inc();
}
