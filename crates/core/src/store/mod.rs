//! Persistence of search history, saved opportunities and preferences.
//!
//! The search pipeline works without a store; when one is attached it
//! receives a history entry after every search.

mod sqlite;
mod types;

pub use sqlite::SqliteStore;
pub use types::*;

use crate::opportunity::OpportunityRecord;

/// Trait for per-caller persistence.
pub trait OpportunityStore: Send + Sync {
    /// Append a history entry.
    fn record_search(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError>;

    /// Most recent history entries of `caller`, newest first.
    fn search_history(&self, caller: &str, limit: usize) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Delete the history of `caller`. Returns the number of entries removed.
    fn clear_history(&self, caller: &str) -> Result<usize, StoreError>;

    /// Keep a copy of a record for `caller`.
    fn save_opportunity(
        &self,
        caller: &str,
        record: &OpportunityRecord,
    ) -> Result<SavedOpportunity, StoreError>;

    /// Saved records of `caller`, newest first.
    fn saved_opportunities(&self, caller: &str) -> Result<Vec<SavedOpportunity>, StoreError>;

    /// Remove one of `caller`'s saved records. Returns false when no such
    /// record belongs to `caller`.
    fn remove_saved(&self, caller: &str, id: &str) -> Result<bool, StoreError>;

    /// Create or replace the preferences of `caller`.
    fn save_preferences(
        &self,
        caller: &str,
        preferences: &UserPreferences,
    ) -> Result<UserPreferences, StoreError>;

    fn preferences(&self, caller: &str) -> Result<Option<UserPreferences>, StoreError>;

    fn stats(&self) -> Result<StoreStats, StoreError>;
}
