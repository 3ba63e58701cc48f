//! Prometheus metrics for the HTTP server.
//!
//! HTTP request metrics live here; source and search metrics come from
//! `litscout_core::metrics` and are registered in the same registry.
//! Store gauges are refreshed on every scrape.

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "litscout_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("litscout_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "litscout_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Store Metrics (collected dynamically)
// =============================================================================

pub static HISTORY_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "litscout_history_entries",
        "Number of recorded searches in the store",
    )
    .unwrap()
});

pub static SAVED_OPPORTUNITIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "litscout_saved_opportunities",
        "Number of saved opportunities in the store",
    )
    .unwrap()
});

/// Sources wired to a live adapter.
pub static LIVE_SOURCES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("litscout_live_sources", "Number of sources backed by live lookups").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let local: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        Box::new(HISTORY_ENTRIES.clone()),
        Box::new(SAVED_OPPORTUNITIES.clone()),
        Box::new(LIVE_SOURCES.clone()),
    ];

    for metric in local
        .into_iter()
        .chain(litscout_core::metrics::all_metrics())
    {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Refresh gauges from current application state before a scrape.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let live = state
        .source_statuses()
        .iter()
        .filter(|status| status.live)
        .count();
    LIVE_SOURCES.set(live as i64);

    if let Some(store) = state.store() {
        match store.stats() {
            Ok(stats) => {
                HISTORY_ENTRIES.set(stats.history_entries as i64);
                SAVED_OPPORTUNITIES.set(stats.saved_opportunities as i64);
            }
            Err(e) => warn!("Failed to read store stats for metrics: {}", e),
        }
    }
}

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    let result = UUID_RE.replace_all(path, "{id}");
    let result = NUMERIC_RE.replace_all(&result, "/{id}$1");
    result.to_string()
}
