//! Types shared by every source adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::opportunity::RawOpportunity;

/// Known opportunity sources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Google,
    DuckDuckGo,
    Yahoo,
    Bravo,
    You,
    Perplexity,
    Bing,
    Government,
    CulturalOrganizations,
}

impl SourceId {
    /// Static table of every known source.
    pub const ALL: [SourceId; 9] = [
        SourceId::Google,
        SourceId::DuckDuckGo,
        SourceId::Yahoo,
        SourceId::Bravo,
        SourceId::You,
        SourceId::Perplexity,
        SourceId::Bing,
        SourceId::Government,
        SourceId::CulturalOrganizations,
    ];

    /// Human-readable label, used as the records' `search_engine`.
    pub fn label(&self) -> &'static str {
        match self {
            SourceId::Google => "Google",
            SourceId::DuckDuckGo => "DuckDuckGo",
            SourceId::Yahoo => "Yahoo!",
            SourceId::Bravo => "Bravo Search",
            SourceId::You => "You.com",
            SourceId::Perplexity => "Perplexity",
            SourceId::Bing => "Bing",
            SourceId::Government => "Busca Governamental",
            SourceId::CulturalOrganizations => "Organizações Culturais",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            SourceId::Google => &["google"],
            SourceId::DuckDuckGo => &["duckduckgo", "ddg"],
            SourceId::Yahoo => &["yahoo"],
            SourceId::Bravo => &["bravo", "bravosearch", "brave"],
            SourceId::You => &["you", "youcom"],
            SourceId::Perplexity => &["perplexity"],
            SourceId::Bing => &["bing"],
            SourceId::Government => &["government", "governo", "buscagovernamental"],
            SourceId::CulturalOrganizations => &[
                "cultural",
                "culturalorganizations",
                "organizaçõesculturais",
                "organizacoesculturais",
            ],
        }
    }

    /// Resolve a caller-supplied source name.
    ///
    /// Case and punctuation are ignored, so "Yahoo!", "yahoo" and
    /// "Bravo Search" all resolve. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .collect();
        if key.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|id| id.aliases().contains(&key.as_str()))
    }

    /// Credential keys a live adapter for this source needs.
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            SourceId::Google => &["GOOGLE_API_KEY", "GOOGLE_CSE_ID"],
            SourceId::Bravo => &["BRAVO_API_KEY"],
            _ => &[],
        }
    }

    /// Whether a live adapter exists for this source.
    pub fn supports_live(&self) -> bool {
        matches!(
            self,
            SourceId::Google | SourceId::DuckDuckGo | SourceId::Yahoo | SourceId::Bravo
        )
    }

    /// Position in [`SourceId::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters handed to every adapter for one aggregation.
#[derive(Debug, Clone)]
pub struct SourceRequest {
    /// Free-text query, may be empty.
    pub query: String,
    /// Ordered, de-duplicated keywords.
    pub keywords: Vec<String>,
    /// Reference time for relative dates.
    pub now: DateTime<Utc>,
    /// Seed for synthetic sources. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl SourceRequest {
    pub fn new(query: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            query: query.into(),
            keywords,
            now: Utc::now(),
            seed: None,
        }
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Query followed by keywords, capped at `limit` terms.
    pub fn search_terms(&self, limit: usize) -> Vec<&str> {
        let query = self.query.trim();
        std::iter::once(query)
            .filter(|q| !q.is_empty())
            .chain(self.keywords.iter().map(|k| k.as_str()))
            .take(limit)
            .collect()
    }
}

/// Errors an adapter can fail with. All are recovered by the aggregator.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Missing credentials or unreachable endpoint.
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Source request timed out")]
    Timeout,

    /// Provider answered with something that could not be parsed.
    #[error("Unparseable source response: {0}")]
    Format(String),
}

impl SourceError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Unavailable(_) => "unavailable",
            SourceError::Timeout => "timeout",
            SourceError::Format(_) => "format",
        }
    }
}

/// Access point to one opportunity source.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Source this adapter serves.
    fn id(&self) -> SourceId;

    /// Whether results come from a live external lookup.
    fn is_live(&self) -> bool {
        false
    }

    /// Fetch listings. An empty vector is a valid success.
    async fn fetch(&self, request: &SourceRequest) -> Result<Vec<RawOpportunity>, SourceError>;
}
