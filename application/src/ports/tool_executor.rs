//! Tool Executor port
//!
//! Defines the interface for invoking the data-access tools.

use async_trait::async_trait;
use multisource_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Definitions of all available tools, in registration order
    fn definitions(&self) -> &[ToolDefinition];

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions().iter().find(|d| d.name == name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.definitions().iter().map(|d| d.name.as_str()).collect()
    }

    /// Invoke a tool. Failures are reported inside the [`ToolResult`].
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
