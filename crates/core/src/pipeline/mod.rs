//! Search pipeline.
//!
//! One search runs, in order:
//! 1. source selection and concurrent fan-out ([`aggregate`]),
//! 2. eligibility classification of every record,
//! 3. the filter chain ([`apply_filters`]),
//! 4. ordering ([`sort_records`]),
//! 5. summary counts ([`summarize`]).
//!
//! Source failures never fail a search. The only error returned to the
//! caller is an empty source selection.

mod aggregator;
mod filter;
mod sort;
mod summary;
mod types;

pub use aggregator::{aggregate, resolve_sources, Aggregation};
pub use filter::{apply_filters, by_deadline, by_type, eligible_only, exclude_other_regions, national_only};
pub use sort::sort_records;
pub use summary::{group_by_type, summarize, Summary};
pub use types::*;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::eligibility::RegionProfile;
use crate::metrics::{SEARCHES_TOTAL, SEARCH_RESULTS};
use crate::source::{SourceRegistry, SourceRequest};
use crate::store::{NewHistoryEntry, OpportunityStore};

/// Runs searches against a source registry.
#[derive(Clone)]
pub struct SearchPipeline {
    registry: Arc<SourceRegistry>,
    region: RegionProfile,
    store: Option<Arc<dyn OpportunityStore>>,
}

impl SearchPipeline {
    pub fn new(registry: Arc<SourceRegistry>, region: RegionProfile) -> Self {
        Self {
            registry,
            region,
            store: None,
        }
    }

    /// Record history through `store` after each search.
    pub fn with_store(mut self, store: Arc<dyn OpportunityStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn region(&self) -> &RegionProfile {
        &self.region
    }

    pub fn store(&self) -> Option<&Arc<dyn OpportunityStore>> {
        self.store.as_ref()
    }

    pub async fn run_search(&self, request: SearchRequest) -> Result<SearchOutcome, PipelineError> {
        self.run_search_at(request, Utc::now()).await
    }

    /// Run a search with `now` as the reference time for synthetic dates and
    /// the deadline horizon.
    pub async fn run_search_at(
        &self,
        request: SearchRequest,
        now: DateTime<Utc>,
    ) -> Result<SearchOutcome, PipelineError> {
        if request.sources.iter().all(|s| s.trim().is_empty()) {
            SEARCHES_TOTAL.with_label_values(&["invalid_request"]).inc();
            return Err(PipelineError::InvalidRequest(
                "select at least one source".to_string(),
            ));
        }

        let start = Instant::now();
        let keywords = normalize_keywords(&request.keywords);
        let source_request = SourceRequest::new(request.query.trim(), keywords)
            .with_now(now)
            .with_seed(request.seed);

        debug!(
            sources = ?request.sources,
            query = %source_request.query,
            "Starting search"
        );

        let aggregation = aggregate(
            &self.registry,
            &self.region,
            &request.sources,
            &source_request,
        )
        .await;

        let fetched = aggregation.records.len();
        let mut records = apply_filters(aggregation.records, &request.filters, now);
        sort_records(&mut records, request.sort);
        let summary = summarize(&records);
        let duration_ms = start.elapsed().as_millis() as u64;

        SEARCHES_TOTAL.with_label_values(&["success"]).inc();
        SEARCH_RESULTS
            .with_label_values(&[])
            .observe(records.len() as f64);

        info!(
            fetched,
            results = records.len(),
            failed_sources = aggregation.source_errors.len(),
            duration_ms,
            "Search complete"
        );

        if let (Some(store), Some(caller)) = (&self.store, &request.caller) {
            let entry = NewHistoryEntry {
                caller: caller.clone(),
                query: source_request.query.clone(),
                sources: aggregation
                    .sources_queried
                    .iter()
                    .map(|id| id.label().to_string())
                    .collect(),
                result_count: records.len(),
            };
            if let Err(e) = store.record_search(entry) {
                warn!(caller = %caller, error = %e, "Failed to record search history");
            }
        }

        Ok(SearchOutcome {
            records,
            summary,
            source_errors: aggregation.source_errors,
            sources_queried: aggregation.sources_queried,
            duration_ms,
        })
    }
}

impl std::fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("registry", &self.registry)
            .field("region", &self.region.code)
            .field("store", &self.store.is_some())
            .finish()
    }
}
