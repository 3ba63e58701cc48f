//! Live source adapters.
//!
//! A [`LiveProvider`] knows how to query one external service and returns
//! raw web hits. [`LiveSource`] wraps a provider with the behavior every
//! live source shares:
//! - required credentials are checked before any I/O (missing ones make
//!   the source unavailable),
//! - the lookup runs under a timeout,
//! - hits are normalized into canonical listings,
//! - a failed or empty lookup degrades to a single labeled placeholder.

mod brave;
mod duckduckgo;
mod google;
mod html;
mod normalize;
mod yahoo;

pub use brave::BraveProvider;
pub use duckduckgo::DuckDuckGoProvider;
pub use google::GoogleProvider;
pub use normalize::{extract_deadline, kind_from_title};
pub use yahoo::YahooProvider;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use crate::credentials::CredentialProvider;
use crate::eligibility::RegionProfile;
use crate::metrics::SOURCE_FETCHES;
use crate::opportunity::RawOpportunity;

use super::{SourceAdapter, SourceError, SourceId, SourceRequest};

/// Terms appended to every live query to focus on literary opportunities.
const LITERARY_TERMS: &str = "concurso literário OR prêmio literatura OR edital cultural OR antologia";

/// Maximum query + keyword terms sent to a provider.
const MAX_TERMS: usize = 5;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// One result as returned by a provider, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct WebHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub published: Option<DateTime<Utc>>,
}

/// Resolved credential values, keyed by credential name.
pub type Credentials = HashMap<&'static str, String>;

/// External lookup for one source.
#[async_trait]
pub trait LiveProvider: Send + Sync {
    fn id(&self) -> SourceId;

    /// Run the composed query against the provider.
    async fn lookup(&self, query: &str, credentials: &Credentials) -> Result<Vec<WebHit>, SourceError>;
}

/// Source adapter backed by a live provider.
pub struct LiveSource<P> {
    provider: P,
    credentials: Arc<dyn CredentialProvider>,
    region: RegionProfile,
    timeout: Duration,
}

impl<P: LiveProvider> LiveSource<P> {
    pub fn new(
        provider: P,
        credentials: Arc<dyn CredentialProvider>,
        region: RegionProfile,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            credentials,
            region,
            timeout,
        }
    }

    fn resolve_credentials(&self) -> Result<Credentials, SourceError> {
        let id = self.provider.id();
        let mut resolved = Credentials::new();
        let mut missing = Vec::new();
        for &key in id.required_keys() {
            match self.credentials.get_credential(id, key) {
                Some(value) => {
                    resolved.insert(key, value);
                }
                None => missing.push(key),
            }
        }
        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(SourceError::Unavailable(format!(
                "missing credentials: {}",
                missing.join(", ")
            )))
        }
    }

    /// Query string sent to the provider.
    pub fn compose_query(&self, request: &SourceRequest) -> String {
        let terms = request.search_terms(MAX_TERMS).join(" ");
        let region_terms = format!("{} OR nacional OR Brasil", self.region.name);
        [terms.as_str(), LITERARY_TERMS, region_terms.as_str()]
            .iter()
            .filter(|t| !t.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn fallback(&self, reason: &str, request: &SourceRequest) -> Vec<RawOpportunity> {
        let id = self.provider.id();
        SOURCE_FETCHES
            .with_label_values(&[id.label(), "placeholder"])
            .inc();
        vec![normalize::placeholder(id, reason, request.now)]
    }
}

#[async_trait]
impl<P: LiveProvider> SourceAdapter for LiveSource<P> {
    fn id(&self) -> SourceId {
        self.provider.id()
    }

    fn is_live(&self) -> bool {
        true
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<Vec<RawOpportunity>, SourceError> {
        let id = self.provider.id();
        let credentials = self.resolve_credentials()?;
        let query = self.compose_query(request);
        let start = Instant::now();

        debug!(source = %id, query = %query, "Live lookup");

        let outcome = tokio::time::timeout(self.timeout, self.provider.lookup(&query, &credentials))
            .await
            .unwrap_or(Err(SourceError::Timeout));

        match outcome {
            Ok(hits) if !hits.is_empty() => {
                debug!(
                    source = %id,
                    hits = hits.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Live lookup complete"
                );
                Ok(hits
                    .into_iter()
                    .map(|hit| normalize::hit_to_raw(hit, id, &self.region))
                    .collect())
            }
            Ok(_) => {
                warn!(source = %id, "Live lookup returned no results, using placeholder");
                Ok(self.fallback("nenhum resultado retornado", request))
            }
            Err(e) => {
                warn!(source = %id, error = %e, "Live lookup failed, using placeholder");
                Ok(self.fallback(&e.to_string(), request))
            }
        }
    }
}

/// HTTP client shared by live providers.
pub fn build_client(timeout: Duration) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SourceError::Unavailable(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn map_request_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else if e.is_decode() {
        SourceError::Format(e.to_string())
    } else {
        SourceError::Unavailable(e.to_string())
    }
}

/// Turn a non-success response into an error, keeping a short body excerpt.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Unavailable(format!(
        "HTTP {}: {}",
        status,
        body.chars().take(200).collect::<String>()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Hits(Vec<WebHit>),
        Fail,
        Hang,
    }

    struct FakeProvider {
        id: SourceId,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(id: SourceId, behavior: Behavior) -> Self {
            Self {
                id,
                behavior,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LiveProvider for FakeProvider {
        fn id(&self) -> SourceId {
            self.id
        }

        async fn lookup(&self, _query: &str, _credentials: &Credentials) -> Result<Vec<WebHit>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Hits(hits) => Ok(hits.clone()),
                Behavior::Fail => Err(SourceError::Format("bad json".to_string())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(vec![])
                }
            }
        }
    }

    fn live(provider: FakeProvider, credentials: StaticCredentials) -> LiveSource<FakeProvider> {
        LiveSource::new(
            provider,
            Arc::new(credentials),
            RegionProfile::default(),
            Duration::from_millis(50),
        )
    }

    fn hit(title: &str, snippet: &str) -> WebHit {
        WebHit {
            title: title.to_string(),
            url: "https://www.funarte.gov.br/edital".to_string(),
            snippet: snippet.to_string(),
            published: None,
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_is_unavailable_without_lookup() {
        let source = live(
            FakeProvider::new(SourceId::Google, Behavior::Hits(vec![])),
            StaticCredentials::new().with(SourceId::Google, "GOOGLE_API_KEY", "k"),
        );
        let err = source.fetch(&SourceRequest::new("q", vec![])).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(ref m) if m.contains("GOOGLE_CSE_ID")));
        assert_eq!(source.provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_hits_are_normalized() {
        let source = live(
            FakeProvider::new(
                SourceId::DuckDuckGo,
                Behavior::Hits(vec![hit("Prêmio Funarte de Poesia", "Inscrições até 10/12/2026")]),
            ),
            StaticCredentials::new(),
        );
        let results = source.fetch(&SourceRequest::new("poesia", vec![])).await.unwrap();
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert!(!r.is_synthetic);
        assert_eq!(r.source, "Funarte");
        assert_eq!(r.search_engine, "DuckDuckGo");
        assert!(r.deadline.is_some());
        assert!(r.citation.as_deref().unwrap().contains("funarte.gov.br"));
    }

    #[tokio::test]
    async fn test_failure_degrades_to_placeholder() {
        let source = live(
            FakeProvider::new(SourceId::Yahoo, Behavior::Fail),
            StaticCredentials::new(),
        );
        let results = source.fetch(&SourceRequest::new("q", vec![])).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_synthetic);
        assert!(results[0].citation.as_deref().unwrap().contains("bad json"));
        assert_eq!(results[0].location, "Nacional (todos os estados)");
    }

    #[tokio::test]
    async fn test_empty_degrades_to_placeholder() {
        let source = live(
            FakeProvider::new(SourceId::DuckDuckGo, Behavior::Hits(vec![])),
            StaticCredentials::new(),
        );
        let results = source.fetch(&SourceRequest::new("q", vec![])).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_synthetic);
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_placeholder() {
        let source = live(
            FakeProvider::new(SourceId::DuckDuckGo, Behavior::Hang),
            StaticCredentials::new(),
        );
        let results = source.fetch(&SourceRequest::new("q", vec![])).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0]
            .citation
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }

    #[test]
    fn test_compose_query() {
        let source = live(
            FakeProvider::new(SourceId::DuckDuckGo, Behavior::Hits(vec![])),
            StaticCredentials::new(),
        );
        let request = SourceRequest::new("poesia", vec!["cordel".to_string()]);
        let query = source.compose_query(&request);
        assert!(query.starts_with("poesia cordel concurso literário"));
        assert!(query.ends_with("Tocantins OR nacional OR Brasil"));

        let empty = source.compose_query(&SourceRequest::new("", vec![]));
        assert!(empty.starts_with("concurso literário"));
    }
}
