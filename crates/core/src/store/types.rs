//! Types for the persistence store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::opportunity::OpportunityRecord;
use crate::pipeline::FilterConfig;

/// History entry to be recorded.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub caller: String,
    pub query: String,
    /// Source labels, in request order.
    pub sources: Vec<String>,
    pub result_count: usize,
}

/// A recorded search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub caller: String,
    pub query: String,
    pub sources: Vec<String>,
    pub result_count: usize,
    pub searched_at: DateTime<Utc>,
}

/// A record kept by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedOpportunity {
    pub id: String,
    pub caller: String,
    pub record: OpportunityRecord,
    pub saved_at: DateTime<Utc>,
}

/// Per-caller defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub preferred_sources: Vec<String>,
    #[serde(default)]
    pub default_filters: FilterConfig,
    /// Set by the store on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Store statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreStats {
    pub history_entries: u64,
    pub saved_opportunities: u64,
    /// Distinct callers with history, saved records or preferences.
    pub callers: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
