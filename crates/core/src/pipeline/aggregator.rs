//! Fan-out across the selected sources.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::eligibility::RegionProfile;
use crate::metrics::{SOURCE_FETCHES, SOURCE_FETCH_DURATION};
use crate::opportunity::OpportunityRecord;
use crate::source::{SourceAdapter, SourceId, SourceRegistry, SourceRequest};

/// Combined output of every invoked adapter.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Records in source order, each source's records in adapter order.
    pub records: Vec<OpportunityRecord>,
    /// Recovered adapter failures, by source label.
    pub source_errors: BTreeMap<String, String>,
    pub sources_queried: Vec<SourceId>,
}

/// Resolve caller-supplied names to registered adapters.
///
/// Unknown or unregistered names are skipped, and a source named twice is
/// queried once, at its first position.
pub fn resolve_sources(
    registry: &SourceRegistry,
    names: &[String],
) -> Vec<(SourceId, Arc<dyn SourceAdapter>)> {
    let mut selected: Vec<(SourceId, Arc<dyn SourceAdapter>)> = Vec::new();
    for name in names {
        let Some(id) = SourceId::from_name(name) else {
            debug!(source = %name, "Skipping unknown source");
            continue;
        };
        if selected.iter().any(|(seen, _)| *seen == id) {
            continue;
        }
        match registry.get(id) {
            Some(adapter) => selected.push((id, adapter.clone())),
            None => debug!(source = %id, "Skipping source without adapter"),
        }
    }
    selected
}

/// Invoke every selected adapter concurrently and concatenate the results
/// in selection order. Adapter failures are logged and recorded, never
/// propagated.
pub async fn aggregate(
    registry: &SourceRegistry,
    region: &RegionProfile,
    names: &[String],
    request: &SourceRequest,
) -> Aggregation {
    let selected = resolve_sources(registry, names);

    let fetches: Vec<_> = selected
        .iter()
        .map(|(id, adapter)| async move {
            let start = Instant::now();
            let result = adapter.fetch(request).await;
            SOURCE_FETCH_DURATION
                .with_label_values(&[id.label()])
                .observe(start.elapsed().as_secs_f64());
            (*id, result)
        })
        .collect();

    let results = futures::future::join_all(fetches).await;

    let mut aggregation = Aggregation::default();
    for (id, result) in results {
        aggregation.sources_queried.push(id);
        match result {
            Ok(raw) => {
                SOURCE_FETCHES
                    .with_label_values(&[id.label(), "success"])
                    .inc();
                debug!(source = %id, results = raw.len(), "Source fetched");
                aggregation.records.extend(raw.into_iter().map(|r| {
                    let classification = region.classify(&r.location);
                    r.into_record(id.label(), classification)
                }));
            }
            Err(e) => {
                SOURCE_FETCHES
                    .with_label_values(&[id.label(), e.kind()])
                    .inc();
                warn!(source = %id, error = %e, "Source failed, skipping");
                aggregation
                    .source_errors
                    .insert(id.label().to_string(), e.to_string());
            }
        }
    }

    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use crate::testing::fixtures::raw;
    use crate::testing::MockSource;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_order_preserved() {
        let a = MockSource::new(SourceId::Google).with_results(vec![
            raw("a1", "Palmas, TO"),
            raw("a2", "São Paulo, SP"),
            raw("a3", "Curitiba, PR"),
        ]);
        let b = MockSource::new(SourceId::Bing).with_delay_ms(20);
        b.set_next_error(SourceError::Timeout).await;

        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(a));
        registry.register(Arc::new(b));

        let out = aggregate(
            &registry,
            &RegionProfile::default(),
            &names(&["Bing", "Google"]),
            &SourceRequest::new("", vec![]),
        )
        .await;

        let titles: Vec<&str> = out.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2", "a3"]);
        assert_eq!(out.records.iter().filter(|r| r.eligible).count(), 1);
        assert!(out.records.iter().all(|r| r.search_engine == "Google"));
        assert_eq!(out.sources_queried, vec![SourceId::Bing, SourceId::Google]);
        assert!(out.source_errors["Bing"].contains("timed out"));
    }

    #[tokio::test]
    async fn test_order_follows_selection_not_completion() {
        let slow = MockSource::new(SourceId::Google)
            .with_results(vec![raw("slow", "Nacional")])
            .with_delay_ms(50);
        let fast = MockSource::new(SourceId::Yahoo).with_results(vec![raw("fast", "Nacional")]);

        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(slow));
        registry.register(Arc::new(fast));

        let out = aggregate(
            &registry,
            &RegionProfile::default(),
            &names(&["Google", "Yahoo!"]),
            &SourceRequest::new("", vec![]),
        )
        .await;
        let titles: Vec<&str> = out.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn test_adapter_label_is_overwritten() {
        let mut foreign = raw("x", "Nacional");
        foreign.search_engine = "Somebody Else".to_string();
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(
            MockSource::new(SourceId::Perplexity).with_results(vec![foreign]),
        ));

        let out = aggregate(
            &registry,
            &RegionProfile::default(),
            &names(&["perplexity"]),
            &SourceRequest::new("", vec![]),
        )
        .await;
        assert_eq!(out.records[0].search_engine, "Perplexity");
    }

    #[test]
    fn test_resolve_skips_unknown_and_duplicates() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(MockSource::new(SourceId::Google)));
        registry.register(Arc::new(MockSource::new(SourceId::Bing)));

        let selected = resolve_sources(
            &registry,
            &names(&["Bing", "Yandex", "google", "BING", "DuckDuckGo"]),
        );
        let ids: Vec<SourceId> = selected.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![SourceId::Bing, SourceId::Google]);
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty() {
        let a = MockSource::new(SourceId::Google);
        a.set_next_error(SourceError::Unavailable("missing credentials".to_string())).await;
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(a));

        let out = aggregate(
            &registry,
            &RegionProfile::default(),
            &names(&["Google"]),
            &SourceRequest::new("", vec![]),
        )
        .await;
        assert!(out.records.is_empty());
        assert_eq!(out.source_errors.len(), 1);
    }
}
