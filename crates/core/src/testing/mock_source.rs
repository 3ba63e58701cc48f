//! Mock source adapter for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::opportunity::RawOpportunity;
use crate::source::{SourceAdapter, SourceError, SourceId, SourceRequest};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub query: String,
    pub keywords: Vec<String>,
    pub seed: Option<u64>,
    pub timestamp: Instant,
}

/// A handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<RawOpportunity>> + Send + Sync>;

/// Mock implementation of the SourceAdapter trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable listings
/// - Track fetches for assertions
/// - Simulate failures and delays
///
/// Clones share state, so a test can keep a handle after registering the
/// adapter.
///
/// # Example
///
/// ```rust,ignore
/// use litscout_core::testing::{fixtures, MockSource};
///
/// let google = MockSource::new(SourceId::Google)
///     .with_results(vec![fixtures::raw("Prêmio", "Palmas, TO")]);
/// registry.register(Arc::new(google.clone()));
///
/// // ... run a search ...
/// assert_eq!(google.fetch_count().await, 1);
/// ```
#[derive(Clone)]
pub struct MockSource {
    id: SourceId,
    live: bool,
    delay: Option<Duration>,
    /// Configured listings to return.
    results: Arc<RwLock<Vec<RawOpportunity>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl std::fmt::Debug for MockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSource")
            .field("id", &self.id)
            .field("live", &self.live)
            .field("delay", &self.delay)
            .field("results", &"<results>")
            .field("fetches", &"<fetches>")
            .finish()
    }
}

impl MockSource {
    /// Create a mock adapter for `id` with no listings.
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            live: false,
            delay: None,
            results: Arc::new(RwLock::new(Vec::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            query_handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Listings returned by every fetch.
    pub fn with_results(self, results: Vec<RawOpportunity>) -> Self {
        Self {
            results: Arc::new(RwLock::new(results)),
            ..self
        }
    }

    /// Sleep before answering.
    pub fn with_delay_ms(self, delay_ms: u64) -> Self {
        Self {
            delay: Some(Duration::from_millis(delay_ms)),
            ..self
        }
    }

    /// Report the adapter as live.
    pub fn as_live(self) -> Self {
        Self { live: true, ..self }
    }

    pub async fn set_results(&self, results: Vec<RawOpportunity>) {
        *self.results.write().await = results;
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set a handler that picks listings from the query string. Returning
    /// `None` falls back to the configured listings.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<RawOpportunity>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    /// Get recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl SourceAdapter for MockSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn is_live(&self) -> bool {
        self.live
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<Vec<RawOpportunity>, SourceError> {
        self.fetches.write().await.push(RecordedFetch {
            query: request.query.clone(),
            keywords: request.keywords.clone(),
            seed: request.seed,
            timestamp: Instant::now(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let handled = match &*self.query_handler.read().await {
            Some(handler) => handler(&request.query),
            None => None,
        };
        let results = match handled {
            Some(results) => results,
            None => self.results.read().await.clone(),
        };

        Ok(results
            .into_iter()
            .map(|mut r| {
                if r.search_engine.is_empty() {
                    r.search_engine = self.id.label().to_string();
                }
                r
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::raw;

    #[tokio::test]
    async fn test_mock_records_and_fails_once() {
        let source = MockSource::new(SourceId::Bing).with_results(vec![raw("a", "Nacional")]);
        let handle = source.clone();
        source.set_next_error(SourceError::Timeout).await;

        let request = SourceRequest::new("poesia", vec!["conto".to_string()]);
        assert!(matches!(source.fetch(&request).await, Err(SourceError::Timeout)));

        let results = source.fetch(&request).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].search_engine, "Bing");

        let fetches = handle.recorded_fetches().await;
        assert_eq!(fetches.len(), 2);
        assert_eq!(fetches[0].keywords, vec!["conto"]);
    }

    #[tokio::test]
    async fn test_query_handler() {
        let source = MockSource::new(SourceId::Google).with_results(vec![raw("default", "Nacional")]);
        source
            .set_query_handler(|q| (q == "vazio").then(Vec::new))
            .await;

        let empty = source.fetch(&SourceRequest::new("vazio", vec![])).await.unwrap();
        assert!(empty.is_empty());
        let other = source.fetch(&SourceRequest::new("poesia", vec![])).await.unwrap();
        assert_eq!(other[0].title, "default");
    }
}
