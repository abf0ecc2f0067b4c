//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agent;
mod history;
mod llm;
mod paths;

pub use agent::FileAgentConfig;
pub use history::{FileHistoryConfig, FileLoggingConfig};
pub use llm::FileLlmConfig;
pub use paths::FilePathsConfig;

use serde::{Deserialize, Serialize};

/// A non-fatal problem found while validating the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted path of the offending key (e.g. `agent.locale`)
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// LLM endpoint and sampling settings
    pub llm: FileLlmConfig,
    /// Decision loop and tool gating
    pub agent: FileAgentConfig,
    /// Data source roots and the data directory
    pub paths: FilePathsConfig,
    /// History retention and keyword statistics
    pub history: FileHistoryConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Issues are warnings: every one has a usable fallback. A missing API
    /// key is not reported here; see [`FileLlmConfig::require_api_key`].
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.agent.issues();

        if self.history.max_entries == 0 {
            issues.push(ConfigIssue::new(
                "history.max_entries",
                "0 is not a usable cap, keeping a single entry",
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            issues.push(ConfigIssue::new(
                "llm.temperature",
                format!("{} is outside the usual 0.0-2.0 range", self.llm.temperature),
            ));
        }

        issues
    }

    /// Copy safe to print (`--show-config`).
    pub fn redacted(&self) -> Self {
        Self {
            llm: self.llm.redacted(),
            ..self.clone()
        }
    }
}
