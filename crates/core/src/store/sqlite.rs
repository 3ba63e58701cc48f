//! SQLite-backed store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    HistoryEntry, NewHistoryEntry, OpportunityStore, SavedOpportunity, StoreError, StoreStats,
    UserPreferences,
};
use crate::opportunity::OpportunityRecord;

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database file, creating it and the tables if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS search_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                caller TEXT NOT NULL,
                query TEXT NOT NULL,
                sources TEXT NOT NULL,
                result_count INTEGER NOT NULL DEFAULT 0,
                searched_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_search_history_caller ON search_history(caller);

            CREATE TABLE IF NOT EXISTS saved_opportunities (
                id TEXT PRIMARY KEY,
                caller TEXT NOT NULL,
                title TEXT NOT NULL,
                record TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_saved_opportunities_caller ON saved_opportunities(caller);

            CREATE TABLE IF NOT EXISTS user_preferences (
                caller TEXT PRIMARY KEY,
                keywords TEXT NOT NULL,
                preferred_sources TEXT NOT NULL,
                default_filters TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn history_from_row(row: &rusqlite::Row) -> rusqlite::Result<(HistoryEntry, String)> {
    let searched_at: String = row.get(5)?;
    let result_count: i64 = row.get(4)?;
    Ok((
        HistoryEntry {
            id: row.get(0)?,
            caller: row.get(1)?,
            query: row.get(2)?,
            sources: Vec::new(),
            result_count: result_count.max(0) as usize,
            searched_at: parse_timestamp(&searched_at),
        },
        row.get(3)?,
    ))
}

impl OpportunityStore for SqliteStore {
    fn record_search(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, StoreError> {
        let conn = self.conn()?;
        let searched_at = Utc::now();
        let sources = serde_json::to_string(&entry.sources)?;

        conn.execute(
            "INSERT INTO search_history (caller, query, sources, result_count, searched_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                entry.caller,
                entry.query,
                sources,
                entry.result_count as i64,
                searched_at.to_rfc3339()
            ],
        )?;

        Ok(HistoryEntry {
            id: conn.last_insert_rowid(),
            caller: entry.caller,
            query: entry.query,
            sources: entry.sources,
            result_count: entry.result_count,
            searched_at,
        })
    }

    fn search_history(&self, caller: &str, limit: usize) -> Result<Vec<HistoryEntry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, caller, query, sources, result_count, searched_at
             FROM search_history WHERE caller = ?
             ORDER BY id DESC LIMIT ?",
        )?;

        let rows = stmt.query_map(params![caller, limit as i64], history_from_row)?;

        let mut entries = Vec::new();
        for row in rows {
            let (mut entry, sources) = row?;
            entry.sources = serde_json::from_str(&sources)?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn clear_history(&self, caller: &str) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM search_history WHERE caller = ?", params![caller])?;
        Ok(removed)
    }

    fn save_opportunity(
        &self,
        caller: &str,
        record: &OpportunityRecord,
    ) -> Result<SavedOpportunity, StoreError> {
        let conn = self.conn()?;
        let saved = SavedOpportunity {
            id: uuid::Uuid::new_v4().to_string(),
            caller: caller.to_string(),
            record: record.clone(),
            saved_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO saved_opportunities (id, caller, title, record, saved_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                saved.id,
                saved.caller,
                saved.record.title,
                serde_json::to_string(&saved.record)?,
                saved.saved_at.to_rfc3339()
            ],
        )?;

        Ok(saved)
    }

    fn saved_opportunities(&self, caller: &str) -> Result<Vec<SavedOpportunity>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, caller, record, saved_at FROM saved_opportunities
             WHERE caller = ? ORDER BY saved_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![caller], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut saved = Vec::new();
        for row in rows {
            let (id, caller, record, saved_at) = row?;
            saved.push(SavedOpportunity {
                id,
                caller,
                record: serde_json::from_str(&record)?,
                saved_at: parse_timestamp(&saved_at),
            });
        }
        Ok(saved)
    }

    fn remove_saved(&self, caller: &str, id: &str) -> Result<bool, StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM saved_opportunities WHERE id = ? AND caller = ?",
            params![id, caller],
        )?;
        Ok(removed > 0)
    }

    fn save_preferences(
        &self,
        caller: &str,
        preferences: &UserPreferences,
    ) -> Result<UserPreferences, StoreError> {
        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO user_preferences
                (caller, keywords, preferred_sources, default_filters, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(caller) DO UPDATE SET
                keywords = excluded.keywords,
                preferred_sources = excluded.preferred_sources,
                default_filters = excluded.default_filters,
                updated_at = excluded.updated_at",
            params![
                caller,
                serde_json::to_string(&preferences.keywords)?,
                serde_json::to_string(&preferences.preferred_sources)?,
                serde_json::to_string(&preferences.default_filters)?,
                now.to_rfc3339()
            ],
        )?;

        Ok(UserPreferences {
            updated_at: Some(now),
            ..preferences.clone()
        })
    }

    fn preferences(&self, caller: &str) -> Result<Option<UserPreferences>, StoreError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT keywords, preferred_sources, default_filters, updated_at
                 FROM user_preferences WHERE caller = ?",
                params![caller],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((keywords, sources, filters, updated_at)) = row else {
            return Ok(None);
        };

        Ok(Some(UserPreferences {
            keywords: serde_json::from_str(&keywords)?,
            preferred_sources: serde_json::from_str(&sources)?,
            default_filters: serde_json::from_str(&filters)?,
            updated_at: Some(parse_timestamp(&updated_at)),
        }))
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        let conn = self.conn()?;

        let history_entries: u64 =
            conn.query_row("SELECT COUNT(*) FROM search_history", [], |row| row.get(0))?;

        let saved_opportunities: u64 = conn.query_row(
            "SELECT COUNT(*) FROM saved_opportunities",
            [],
            |row| row.get(0),
        )?;

        let callers: u64 = conn.query_row(
            "SELECT COUNT(*) FROM (
                SELECT caller FROM search_history
                UNION SELECT caller FROM saved_opportunities
                UNION SELECT caller FROM user_preferences
             )",
            [],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            history_entries,
            saved_opportunities,
            callers,
        })
    }
}
