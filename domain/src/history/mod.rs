//! History domain module
//!
//! The bounded conversation log, its statistics and the export renderers.
//! Storage lives in the infrastructure layer; everything here is pure.

pub mod entities;
pub mod export;
pub mod log;

pub use entities::{HistoryEntry, HistoryStats, KeywordCount, KeywordPolicy};
pub use export::ExportFormat;
pub use log::HistoryLog;

use thiserror::Error;

/// Failure writing history to disk. The in-memory log is never affected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Failed to export history to {path}: {message}")]
    Export { path: String, message: String },

    #[error("Failed to persist history to {path}: {message}")]
    Persistence { path: String, message: String },
}
