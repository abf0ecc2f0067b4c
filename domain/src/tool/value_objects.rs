//! Tool domain value objects - immutable result and error types
//!
//! Every tool invocation produces a [`ToolResult`]. Failures carry a
//! [`ToolError`] whose variant identifies the failure kind; the agent loop
//! turns it into observation text instead of aborting the query.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error that occurred during tool invocation.
///
/// | Variant | Code | Kind |
/// |---------|------|------|
/// | `InvalidArgument` | `INVALID_ARGUMENT` | bad or missing input |
/// | `SourceNotFound`, `DocumentNotFound` | `NOT_FOUND` | user input error |
/// | `QueryExecution`, `DocumentRead`, `CommandExecution` | `EXECUTION_FAILED` | downstream failure |
/// | `CommandTimeout` | `TIMEOUT` | downstream failure |
/// | `CapabilityDisabled`, `UnsafeCommand` | `PERMISSION_DENIED` | policy rejection |
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum ToolError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Data source not found: {0}")]
    SourceNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Query failed: {0}")]
    QueryExecution(String),

    #[error("Could not read document: {0}")]
    DocumentRead(String),

    #[error("Command failed: {0}")]
    CommandExecution(String),

    #[error("Command timed out after {0}s")]
    CommandTimeout(u64),

    #[error("{0}")]
    CapabilityDisabled(String),

    #[error("{0}")]
    UnsafeCommand(String),
}

impl ToolError {
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ToolError::SourceNotFound(_) | ToolError::DocumentNotFound(_) => "NOT_FOUND",
            ToolError::QueryExecution(_)
            | ToolError::DocumentRead(_)
            | ToolError::CommandExecution(_) => "EXECUTION_FAILED",
            ToolError::CommandTimeout(_) => "TIMEOUT",
            ToolError::CapabilityDisabled(_) | ToolError::UnsafeCommand(_) => "PERMISSION_DENIED",
        }
    }

    /// Text fed back to the LLM as the observation of a failed step.
    pub fn to_observation(&self) -> String {
        format!("Error: [{}] {}", self.code(), self)
    }
}

/// Registration or lookup failure in the tool registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Result of a tool invocation, carrying output or error information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    pub success: bool,
    /// Output text (pretty-printed JSON for the data tools)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
///
/// | Tool | `duration_ms` | `bytes` | `path` | `exit_code` | `match_count` |
/// |------|:---:|:---:|:---:|:---:|:---:|
/// | `sqlite_query` | yes | - | yes | - | yes (rows) |
/// | `document_search` | yes | yes | yes | - | yes |
/// | `shell_command` | yes | - | - | yes | - |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Observation text for the agent loop: the output on success, the
    /// formatted error otherwise.
    pub fn observation(&self) -> String {
        match (&self.output, &self.error) {
            (_, Some(err)) => err.to_observation(),
            (Some(output), None) => output.clone(),
            (None, None) => String::new(),
        }
    }
}
