//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Sequence allocations by scope kind and outcome
//! - Fan-out side effects by job kind and outcome
//! - Fan-out queue depth
//! - Database query duration histograms

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace("chat_service"),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace("chat_service")
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Sequence numbers handed out (or refused) by the allocator
pub static SEQUENCE_ALLOCATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sequence_allocations_total",
            "Sequence allocation attempts by scope kind and outcome",
        )
        .namespace("chat_service"),
        &["scope", "outcome"], // outcome: "allocated", "unavailable"
    )
    .expect("Failed to create SEQUENCE_ALLOCATIONS_TOTAL metric")
});

/// Background side effects by job kind and outcome
pub static FANOUT_JOBS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fanout_jobs_total", "Fan-out side effects by job and outcome")
            .namespace("chat_service"),
        &["job", "outcome"], // "succeeded", "failed", "timed_out", "dropped"
    )
    .expect("Failed to create FANOUT_JOBS_TOTAL metric")
});

/// Jobs waiting in the fan-out queue
pub static FANOUT_QUEUE_DEPTH: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("fanout_queue_depth", "Side effects waiting for a worker")
            .namespace("chat_service"),
    )
    .expect("Failed to create FANOUT_QUEUE_DEPTH metric")
});

/// Database query duration histogram
pub static DB_QUERY_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];
    HistogramVec::new(
        HistogramOpts::new(
            "db_query_duration_seconds",
            "Database query latency in seconds",
        )
        .namespace("chat_service")
        .buckets(buckets),
        &["operation", "table"],
    )
    .expect("Failed to create DB_QUERY_DURATION_SECONDS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(SEQUENCE_ALLOCATIONS_TOTAL.clone()))
        .expect("Failed to register SEQUENCE_ALLOCATIONS_TOTAL");
    registry
        .register(Box::new(FANOUT_JOBS_TOTAL.clone()))
        .expect("Failed to register FANOUT_JOBS_TOTAL");
    registry
        .register(Box::new(FANOUT_QUEUE_DEPTH.clone()))
        .expect("Failed to register FANOUT_QUEUE_DEPTH");
    registry
        .register(Box::new(DB_QUERY_DURATION_SECONDS.clone()))
        .expect("Failed to register DB_QUERY_DURATION_SECONDS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record an allocator call
pub fn record_allocation(scope: &str, outcome: &str) {
    SEQUENCE_ALLOCATIONS_TOTAL
        .with_label_values(&[scope, outcome])
        .inc();
}

/// Helper to record the outcome of a background side effect
pub fn record_fanout_job(job: &str, outcome: &str) {
    FANOUT_JOBS_TOTAL.with_label_values(&[job, outcome]).inc();
}

/// Helper to publish the current fan-out backlog
pub fn set_fanout_queue_depth(depth: usize) {
    FANOUT_QUEUE_DEPTH.set(depth as i64);
}

/// Helper to record database query metrics
pub fn record_db_query(operation: &str, table: &str, duration_secs: f64) {
    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[operation, table])
        .observe(duration_secs);
}
