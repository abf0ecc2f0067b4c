//! Data-access tools
//!
//! The agent can reach three kinds of source, each through one tool:
//!
//! | Tool | Source | Risk |
//! |------|--------|------|
//! | `sqlite_query` | `*.db` files under `paths.sqlite` | Low |
//! | `document_search` | text and markdown files under `paths.documents` | Low |
//! | `shell_command` | the host shell, gated by `agent.enable_shell_commands` | High |
//!
//! The set is closed: [`DataTool`] enumerates it and the [`ToolRegistry`]
//! dispatches with a `match`, so a new tool is a compile error until every
//! dispatch site handles it.

pub mod document_search;
pub mod registry;
pub mod schema;
pub mod shell_command;
pub mod structured_query;

pub use document_search::{
    DOCUMENT_SEARCH, DocumentSearchOutput, DocumentSearchTool, LineMatch,
    document_search_definition, find_matches,
};
pub use registry::ToolRegistry;
pub use schema::JsonSchemaToolConverter;
pub use shell_command::{
    COMMAND_TIMEOUT, CommandOutput, SHELL_COMMAND, ShellCommandTool, shell_command_definition,
};
pub use structured_query::{
    QueryRows, SQLITE_QUERY, StructuredQueryTool, sqlite_query_definition,
};

use crate::config::FilePathsConfig;
use multisource_domain::{Locale, RegistryError, ToolCall, ToolDefinition, ToolResult};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// One of the data-access tools.
#[derive(Debug, Clone)]
pub enum DataTool {
    StructuredQuery(StructuredQueryTool),
    DocumentSearch(DocumentSearchTool),
    ShellCommand(ShellCommandTool),
}

impl DataTool {
    pub fn name(&self) -> &'static str {
        match self {
            DataTool::StructuredQuery(_) => SQLITE_QUERY,
            DataTool::DocumentSearch(_) => DOCUMENT_SEARCH,
            DataTool::ShellCommand(_) => SHELL_COMMAND,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            DataTool::StructuredQuery(_) => sqlite_query_definition(),
            DataTool::DocumentSearch(_) => document_search_definition(),
            DataTool::ShellCommand(_) => shell_command_definition(),
        }
    }

    pub async fn invoke(&self, call: &ToolCall) -> ToolResult {
        match self {
            DataTool::StructuredQuery(tool) => tool.invoke(call).await,
            DataTool::DocumentSearch(tool) => tool.invoke(call).await,
            DataTool::ShellCommand(tool) => tool.invoke(call).await,
        }
    }
}

/// Failure while assembling the tool set at startup.
#[derive(Error, Debug)]
pub enum ToolSetupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("invalid deny-list pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Registry holding the three data tools, in prompt order.
pub fn default_registry(
    paths: &FilePathsConfig,
    enable_shell_commands: bool,
    locale: Locale,
) -> Result<ToolRegistry, ToolSetupError> {
    let mut registry = ToolRegistry::new();
    registry.register(DataTool::StructuredQuery(StructuredQueryTool::new(
        &paths.sqlite,
    )))?;
    registry.register(DataTool::DocumentSearch(DocumentSearchTool::new(
        &paths.documents,
    )))?;
    registry.register(DataTool::ShellCommand(ShellCommandTool::new(
        enable_shell_commands,
        locale,
    )?))?;
    Ok(registry)
}

/// Join `name` onto `root` when it stays inside it.
///
/// Absolute paths and `..` components are refused.
pub(crate) fn resolve_under(root: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    let mut has_file = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => has_file = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    has_file.then(|| root.join(relative))
}
