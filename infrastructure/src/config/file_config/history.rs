//! History configuration from TOML (`[history]` section)

use multisource_domain::KeywordPolicy;
use serde::{Deserialize, Serialize};

/// Raw history configuration from TOML
///
/// ```toml
/// [history]
/// max_entries = 50
/// min_keyword_len = 4          # shorter words are ignored by the keyword ranking
/// stop_words = ["qual", "como", "onde", "quando", "porque", "para", "sobre"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHistoryConfig {
    pub max_entries: usize,
    pub min_keyword_len: usize,
    pub stop_words: Vec<String>,
}

impl Default for FileHistoryConfig {
    fn default() -> Self {
        let policy = KeywordPolicy::default();
        Self {
            max_entries: 50,
            min_keyword_len: policy.min_len,
            stop_words: policy.stop_words,
        }
    }
}

impl FileHistoryConfig {
    pub fn keyword_policy(&self) -> KeywordPolicy {
        KeywordPolicy {
            min_len: self.min_keyword_len,
            stop_words: self.stop_words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

/// Logging configuration (`[logging]` section)
///
/// ```toml
/// [logging]
/// file = true   # also write a daily-rolling log under <data_dir>/logs
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub file: bool,
}
