//! Infrastructure layer for multisource-agent
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, the OpenAI-compatible
//! LLM gateway, the data-access tools, the file-backed history store and
//! the local data-source catalog.

pub mod catalog;
pub mod config;
pub mod history;
pub mod llm;
pub mod tools;

// Re-export commonly used types
pub use catalog::LocalDataSources;
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileAgentConfig, FileConfig, FileHistoryConfig,
    FileLlmConfig, FileLoggingConfig, FilePathsConfig,
};
pub use history::JsonHistoryStore;
pub use llm::{OpenAiGateway, OpenAiSettings};
pub use tools::{DataTool, JsonSchemaToolConverter, ToolRegistry, ToolSetupError, default_registry};
