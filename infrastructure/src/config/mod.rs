//! Configuration file loading for multisource-agent
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MSA_*` environment variables (`__` separates sections)
//! 2. `OPENAI_API_KEY`
//! 3. `--config <path>` specified file
//! 4. Project root: `./multisource.toml` or `./.multisource.toml`
//! 5. XDG config: `$XDG_CONFIG_HOME/multisource-agent/config.toml`
//! 6. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    ConfigIssue, FileAgentConfig, FileConfig, FileHistoryConfig, FileLlmConfig,
    FileLoggingConfig, FilePathsConfig,
};
pub use loader::ConfigLoader;
