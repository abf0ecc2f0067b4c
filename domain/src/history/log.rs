//! Bounded, most-recent-first conversation log.

use super::entities::{HistoryEntry, HistoryStats, KeywordCount, KeywordPolicy};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;

const TOP_KEYWORDS: usize = 5;

/// In-memory history log.
///
/// Holds at most `max_entries` items, newest at index 0. Inserting beyond
/// the cap evicts from the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl HistoryLog {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Restore a previously persisted log, keeping its order and applying
    /// the current cap.
    pub fn from_entries(entries: Vec<HistoryEntry>, max_entries: usize) -> Self {
        let mut log = Self::new(max_entries);
        log.entries = entries;
        log.entries.truncate(log.max_entries);
        log
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Insert at the head, returning any entries evicted from the tail.
    pub fn insert(&mut self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        self.entries.insert(0, entry);
        if self.entries.len() > self.max_entries {
            self.entries.split_off(self.max_entries)
        } else {
            Vec::new()
        }
    }

    /// The first `limit` entries, or the whole log when `limit` is absent
    /// or zero.
    pub fn get_history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        match limit {
            Some(n) if n > 0 => self.entries.iter().take(n).cloned().collect(),
            _ => self.entries.clone(),
        }
    }

    pub fn search(&self, term: &str) -> Vec<HistoryEntry> {
        let needle = term.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.matches(&needle))
            .cloned()
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Compute statistics; `today` is the current local date.
    pub fn stats(&self, today: NaiveDate, policy: &KeywordPolicy) -> HistoryStats {
        let total = self.entries.len();
        let successful = self.entries.iter().filter(|e| e.success).count();
        let failed = total - successful;

        // Tenths of a percent, exact halves rounded up
        let success_rate = if total > 0 {
            let tenths = (successful * 2000 + total) / (2 * total);
            format!("{}.{}", tenths / 10, tenths % 10)
        } else {
            "0".to_string()
        };

        let today_count = self
            .entries
            .iter()
            .filter_map(|e| e.parsed_timestamp())
            .filter(|ts| ts.with_timezone(&Local).date_naive() == today)
            .count();

        HistoryStats {
            total,
            successful,
            failed,
            success_rate,
            today_count,
            top_keywords: self.top_keywords(policy),
            oldest_entry_timestamp: self.entries.last().map(|e| e.timestamp.clone()),
            newest_entry_timestamp: self.entries.first().map(|e| e.timestamp.clone()),
        }
    }

    fn top_keywords(&self, policy: &KeywordPolicy) -> Vec<KeywordCount> {
        // First-seen order is the tie-break, so counts are kept in a Vec
        let mut counts: Vec<KeywordCount> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for entry in &self.entries {
            let query = entry.query.to_lowercase();
            for word in query.split_whitespace().filter(|w| policy.accepts(w)) {
                match index.get(word).copied() {
                    Some(i) => counts[i].count += 1,
                    None => {
                        index.insert(word.to_string(), counts.len());
                        counts.push(KeywordCount {
                            word: word.to_string(),
                            count: 1,
                        });
                    }
                }
            }
        }

        // sort_by is stable
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(TOP_KEYWORDS);
        counts
    }
}
