//! History domain entities

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One recorded query/response exchange.
///
/// Never mutated after creation; removed only by explicit deletion or
/// eviction from the bounded log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// ISO-8601 UTC timestamp with millisecond precision
    pub timestamp: String,
    pub query: String,
    pub response: String,
    pub success: bool,
    pub duration_ms: u64,
}

impl HistoryEntry {
    /// Build an entry, trimming surrounding whitespace from the query and
    /// the response.
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        query: &str,
        response: &str,
        success: bool,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            query: query.trim().to_string(),
            response: response.trim().to_string(),
            success,
            duration_ms,
        }
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Timestamp in local time using `format`, falling back to the raw
    /// string when it cannot be parsed.
    pub fn local_timestamp(&self, format: &str) -> String {
        match self.parsed_timestamp() {
            Some(dt) => dt.with_timezone(&Local).format(format).to_string(),
            None => self.timestamp.clone(),
        }
    }

    pub fn status_glyph(&self) -> &'static str {
        if self.success { "✅" } else { "❌" }
    }

    /// Case-insensitive substring match against the query or the response.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.query.to_lowercase().contains(needle) || self.response.to_lowercase().contains(needle)
    }
}

/// Frequency of one query keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Derived analytics over the whole log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage with one decimal ("66.7"), or "0" for an empty log
    pub success_rate: String,
    pub today_count: usize,
    pub top_keywords: Vec<KeywordCount>,
    pub oldest_entry_timestamp: Option<String>,
    pub newest_entry_timestamp: Option<String>,
}

/// Rules for extracting keywords from queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordPolicy {
    /// Words shorter than this are discarded
    pub min_len: usize,
    pub stop_words: Vec<String>,
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            min_len: 4,
            stop_words: ["qual", "como", "onde", "quando", "porque", "para", "sobre"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

impl KeywordPolicy {
    pub fn accepts(&self, word: &str) -> bool {
        word.chars().count() >= self.min_len && !self.stop_words.iter().any(|s| s == word)
    }
}
