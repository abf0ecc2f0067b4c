//! Port for the conversation history store.
//!
//! Mutations never fail the caller: the in-memory log is authoritative and
//! persistence problems are logged by the adapter. Only `export` reports an
//! error, since the caller asked for a file.

use chrono::{DateTime, Utc};
use multisource_domain::{ExportFormat, HistoryEntry, HistoryError, HistoryStats};
use std::path::PathBuf;

pub trait HistoryStorePort: Send + Sync {
    /// Record a completed exchange and return its id.
    fn add_entry(
        &self,
        query: &str,
        response: &str,
        timestamp: DateTime<Utc>,
        duration_ms: u64,
        success: bool,
    ) -> String;

    /// First `limit` entries (most-recent-first); all when `limit` is
    /// `None` or zero.
    fn get_history(&self, limit: Option<usize>) -> Vec<HistoryEntry>;

    fn search(&self, term: &str) -> Vec<HistoryEntry>;

    fn get_by_id(&self, id: &str) -> Option<HistoryEntry>;

    fn remove(&self, id: &str) -> Option<HistoryEntry>;

    fn clear(&self);

    fn stats(&self) -> HistoryStats;

    /// Write the full log to a new timestamped file and return its path.
    fn export(&self, format: ExportFormat) -> Result<PathBuf, HistoryError>;
}
