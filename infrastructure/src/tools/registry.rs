//! Tool Registry
//!
//! The [`ToolRegistry`] owns the data tools and implements
//! [`ToolExecutorPort`]. Tools are registered once at startup; afterwards
//! the registry is only read and can be shared across concurrent queries.
//!
//! # Usage
//!
//! ```ignore
//! use multisource_infrastructure::tools::{DataTool, DocumentSearchTool, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(DataTool::DocumentSearch(DocumentSearchTool::new("./data/documents")))?;
//!
//! let call = ToolCall::new("document_search").with_arg("filename", "manual.md");
//! let result = registry.execute(&call).await;
//! ```

use super::DataTool;
use async_trait::async_trait;
use multisource_application::ports::tool_executor::ToolExecutorPort;
use multisource_domain::tool::{
    entities::{ToolCall, ToolDefinition},
    value_objects::{RegistryError, ToolError, ToolResult},
};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Registered tools in registration order
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<DataTool>,
    /// Cached definitions, parallel to `tools`
    definitions: Vec<ToolDefinition>,
    /// Tool name -> index into `tools`
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, tool: DataTool) -> Result<(), RegistryError> {
        let name = tool.name();
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateTool(name.to_string()));
        }

        debug!(tool = %name, "Registering tool");
        self.index.insert(name.to_string(), self.tools.len());
        self.definitions.push(tool.definition());
        self.tools.push(tool);
        Ok(())
    }

    /// Tools in registration order
    pub fn list(&self) -> &[DataTool] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Result<&DataTool, RegistryError> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.get(&call.tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                return ToolResult::failure(&call.tool_name, ToolError::InvalidArgument(e.to_string()));
            }
        };

        let start = Instant::now();
        let mut result = tool.invoke(call).await;
        if result.metadata.duration_ms.is_none() {
            result.metadata.duration_ms = Some(start.elapsed().as_millis() as u64);
        }

        debug!(
            tool = %call.tool_name,
            success = result.is_success(),
            duration_ms = ?result.metadata.duration_ms,
            "Tool executed"
        );
        result
    }
}
