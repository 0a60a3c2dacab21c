//! SQLite access layer.
//!
//! RULE: Only store/ talks to the database.
//! The aggregation layer hands over an AggregateSpec; it never builds SQL.

use crate::{
    aggregation::spec::FactTable,
    error::{InsightsError, InsightsResult},
};
use rusqlite::{params, Connection, OpenFlags};

mod aggregate;
mod facts;

pub use aggregate::CompiledQuery;

pub struct InsightsStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl InsightsStore {
    /// Open (or create) a fact database at `path` for writing.
    /// Used by the demo generator; the dashboard opens read-only.
    pub fn open(path: &str) -> InsightsResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| unavailable(path, e))?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an existing fact database. Fails if the file is missing.
    pub fn open_read_only(path: &str) -> InsightsResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| unavailable(path, e))?;
        let store = Self {
            conn,
            path: Some(path.to_string()),
        };
        store.verify_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> InsightsResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> InsightsResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_facts.sql"))?;
        Ok(())
    }

    /// Every fact table must exist before any view may query.
    pub fn verify_schema(&self) -> InsightsResult<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
        for table in FactTable::ALL {
            let found: i64 = stmt.query_row(params![table.table_name()], |row| row.get(0))?;
            if found == 0 {
                return Err(InsightsError::StoreUnavailable {
                    path: self.path().unwrap_or(":memory:").to_string(),
                    reason: format!("missing fact table '{}'", table.table_name()),
                });
            }
        }
        Ok(())
    }

    // ── Regions ────────────────────────────────────────────────

    /// Distinct region names from the transaction facts, sorted.
    pub fn distinct_regions(&self) -> InsightsResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT region FROM aggregated_transaction ORDER BY region ASC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Batching ───────────────────────────────────────────────

    /// Run `f` inside one transaction. Used for bulk fact loads.
    pub fn with_transaction<F>(&self, f: F) -> InsightsResult<()>
    where
        F: FnOnce(&Self) -> InsightsResult<()>,
    {
        let tx = self.conn.unchecked_transaction()?;
        f(self)?;
        tx.commit()?;
        Ok(())
    }
}

fn unavailable(path: &str, e: rusqlite::Error) -> InsightsError {
    InsightsError::StoreUnavailable {
        path: path.to_string(),
        reason: e.to_string(),
    }
}
