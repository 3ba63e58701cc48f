//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Source adapters (fetch outcomes, latency)
//! - Search pipeline (searches, result counts)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Source Adapters
// =============================================================================

/// Adapter invocations by source and result.
pub static SOURCE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "litscout_source_fetches_total",
            "Total source adapter invocations",
        ),
        &["source", "result"], // "success", "placeholder", "unavailable", "timeout", "format"
    )
    .unwrap()
});

/// Adapter latency in seconds.
pub static SOURCE_FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "litscout_source_fetch_duration_seconds",
            "Duration of one source adapter invocation",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Search Pipeline
// =============================================================================

/// Searches by result.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("litscout_searches_total", "Total searches run"),
        &["result"], // "success", "invalid_request"
    )
    .unwrap()
});

/// Records returned per search, after filtering.
pub static SEARCH_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "litscout_search_results",
            "Number of records returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &[],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Sources
        Box::new(SOURCE_FETCHES.clone()),
        Box::new(SOURCE_FETCH_DURATION.clone()),
        // Pipeline
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_RESULTS.clone()),
    ]
}
