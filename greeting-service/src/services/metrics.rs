//! Prometheus metrics for greeting-service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec, Encoder,
    HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

/// Recorder behind the `metrics` facade, fed by the HTTP middleware.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Counter for greetings returned by the hello endpoint.
pub static GREETINGS_SERVED: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "greeting_served_total",
        "Total number of greetings served"
    )
    .expect("Failed to register GREETINGS_SERVED")
});

/// Counter for find-all queries by entity kind and outcome.
pub static ENTITY_QUERIES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "greeting_entity_queries_total",
        "Total number of find-all queries by entity kind",
        &["entity", "status"]
    )
    .expect("Failed to register ENTITY_QUERIES")
});

/// Histogram for database query duration.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "greeting_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

fn install_recorder() -> PrometheusHandle {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            // Another global recorder owns the facade; render an empty one.
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            PrometheusBuilder::new().build_recorder().handle()
        }
    }
}

/// Install the facade recorder once per process and force lazy registration.
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(install_recorder);
    Lazy::force(&GREETINGS_SERVED);
    Lazy::force(&ENTITY_QUERIES);
    Lazy::force(&DB_QUERY_DURATION);
}

/// Get all metrics as Prometheus text format: facade metrics first, then
/// the service registry.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => output.push_str(&String::from_utf8_lossy(&buffer)),
        Err(e) => tracing::error!(error = %e, "Failed to encode metrics"),
    }
    output
}

/// Record a greeting served.
pub fn record_greeting_served() {
    GREETINGS_SERVED.inc();
}

/// Record a find-all query.
pub fn record_entity_query(entity: &str, status: &str) {
    ENTITY_QUERIES.with_label_values(&[entity, status]).inc();
}
