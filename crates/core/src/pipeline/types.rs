//! Request, configuration and outcome types of the search pipeline.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::opportunity::{OpportunityRecord, OpportunityType};
use crate::source::SourceId;

use super::Summary;

/// Errors surfaced to the caller of a search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// How far ahead deadlines may fall.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineHorizon {
    /// No deadline restriction.
    #[default]
    None,
    Next7Days,
    Next30Days,
    Next90Days,
}

impl DeadlineHorizon {
    /// Window after `now`, `None` for no restriction.
    pub fn window(&self) -> Option<Duration> {
        match self {
            DeadlineHorizon::None => None,
            DeadlineHorizon::Next7Days => Some(Duration::days(7)),
            DeadlineHorizon::Next30Days => Some(Duration::days(30)),
            DeadlineHorizon::Next90Days => Some(Duration::days(90)),
        }
    }
}

impl FromStr for DeadlineHorizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "todos" | "all" => Ok(DeadlineHorizon::None),
            "next7days" | "próximos 7 dias" => Ok(DeadlineHorizon::Next7Days),
            "next30days" | "próximos 30 dias" => Ok(DeadlineHorizon::Next30Days),
            "next90days" | "próximos 90 dias" => Ok(DeadlineHorizon::Next90Days),
            _ => Err(format!("unknown deadline horizon: {}", s)),
        }
    }
}

/// Filter chain settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Keep only eligible records (ignored when `national_only` is set).
    #[serde(default = "default_true")]
    pub include_target_region: bool,
    /// Keep only target-region and nation-wide records.
    #[serde(default)]
    pub exclude_other_regions: bool,
    /// Keep only nation-wide records.
    #[serde(default)]
    pub national_only: bool,
    /// Allowed types; empty means any.
    #[serde(default)]
    pub types: Vec<OpportunityType>,
    #[serde(default)]
    pub deadline: DeadlineHorizon,
}

fn default_true() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include_target_region: true,
            exclude_other_regions: false,
            national_only: false,
            types: Vec::new(),
            deadline: DeadlineHorizon::None,
        }
    }
}

impl FilterConfig {
    /// No narrowing at all.
    pub fn permissive() -> Self {
        Self {
            include_target_region: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Aggregation order.
    #[default]
    Relevance,
    PublishedDate,
    Deadline,
    Type,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" | "relevância" => Ok(SortKey::Relevance),
            "published_date" | "data de publicação" => Ok(SortKey::PublishedDate),
            "deadline" | "prazo" => Ok(SortKey::Deadline),
            "type" | "tipo" => Ok(SortKey::Type),
            _ => Err(format!("unknown sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascending" | "asc" | "crescente" => Ok(SortDirection::Ascending),
            "descending" | "desc" | "decrescente" => Ok(SortDirection::Descending),
            _ => Err(format!("unknown sort direction: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// One search, as constructed by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Selected source names, in priority order.
    pub sources: Vec<String>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub sort: SortSpec,
    /// Caller identity for history; `None` skips history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    /// Seed for synthetic sources, for reproducible results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SearchRequest {
    pub fn new<S: Into<String>>(sources: impl IntoIterator<Item = S>, query: impl Into<String>) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = SortSpec::new(key, direction);
        self
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Trim keywords, drop empties and duplicates (first occurrence wins).
pub fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !out.iter().any(|k| k == keyword) {
            out.push(keyword.to_string());
        }
    }
    out
}

/// Result of one search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Filtered and sorted records.
    pub records: Vec<OpportunityRecord>,
    pub summary: Summary,
    /// Recovered adapter failures, by source label.
    pub source_errors: BTreeMap<String, String>,
    /// Sources actually invoked, in request order.
    pub sources_queried: Vec<SourceId>,
    pub duration_ms: u64,
}
