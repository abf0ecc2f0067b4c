//! Data locations from TOML (`[paths]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const HISTORY_FILE: &str = "conversation_history.json";

/// Raw path configuration from TOML
///
/// ```toml
/// [paths]
/// sqlite = "./data/sqlite"        # *.db files queried by sqlite_query
/// documents = "./data/documents"  # *.txt / *.md files read by document_search
/// data_dir = "./data"             # history file, exports and log files
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePathsConfig {
    pub sqlite: PathBuf,
    pub documents: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for FilePathsConfig {
    fn default() -> Self {
        Self {
            sqlite: PathBuf::from("./data/sqlite"),
            documents: PathBuf::from("./data/documents"),
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl FilePathsConfig {
    /// Location of the persisted history log
    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    /// Directory for rolling log files
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
