//! Prometheus Metrics for the Feed Pipeline
//!
//! Metrics include:
//! - diagnostic events per kind
//! - records assembled
//! - fetch latency per stage (histogram)

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramOpts, HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};
use tracing::error;

// ============================================
// METRIC DEFINITIONS
// ============================================

/// Stages of the feed pipeline
pub const STAGE_FEED: &str = "feed";
pub const STAGE_THUMBNAIL: &str = "thumbnail";

// Diagnostic events counter
static EVENTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "newsfeed_events_total",
        "Total number of diagnostic events by kind",
        &["event"]
    )
    .expect("Failed to create events metric")
});

// Records handed back to callers
static RECORDS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "newsfeed_records_total",
        "Total number of news records assembled"
    )
    .expect("Failed to create records metric")
});

// Request latency histogram (in seconds)
static FETCH_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 25.0];
    register_histogram_vec!(
        HistogramOpts::new(
            "newsfeed_fetch_latency_seconds",
            "Latency of HTTP fetches per stage in seconds"
        )
        .buckets(buckets),
        &["stage"]
    )
    .expect("Failed to create fetch_latency metric")
});

// ============================================
// METRICS API
// ============================================

/// Records a diagnostic event
pub fn record_event(event: &str) {
    EVENTS.with_label_values(&[event]).inc();
}

/// Records assembled records
pub fn record_records(count: u64) {
    RECORDS.inc_by(count);
}

/// Records fetch latency
pub fn record_fetch_latency(stage: &str, latency_secs: f64) {
    FETCH_LATENCY.with_label_values(&[stage]).observe(latency_secs);
}

/// Reads the current count of an event kind
pub fn event_count(event: &str) -> u64 {
    EVENTS.with_label_values(&[event]).get()
}

// ============================================
// METRICS COLLECTION
// ============================================

/// Collects all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_event_increments() {
        let before = event_count("metrics_test_event");
        record_event("metrics_test_event");
        record_event("metrics_test_event");
        assert_eq!(event_count("metrics_test_event"), before + 2);
    }

    #[test]
    fn test_gather_contains_registered_metrics() {
        record_event("metrics_gather_event");
        record_records(1);
        record_fetch_latency(STAGE_FEED, 0.2);

        let text = gather_metrics();
        assert!(text.contains("newsfeed_events_total"));
        assert!(text.contains("newsfeed_records_total"));
        assert!(text.contains("newsfeed_fetch_latency_seconds"));
    }
}
