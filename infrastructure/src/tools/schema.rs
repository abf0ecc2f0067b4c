//! JSON Schema tool converter.
//!
//! Produces the `tools` array of an OpenAI-compatible chat completion request
//! from the registered [`ToolDefinition`]s.

use multisource_domain::ToolDefinition;
use serde_json::{Map, Value, json};

/// Converts tool definitions into function-calling schemas.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - anything else → `"string"`
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    /// JSON Schema object describing the tool's parameters.
    pub fn parameters_schema(tool: &ToolDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                _ => "string",
            };

            properties.insert(
                param.name.clone(),
                json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn tool_to_schema(tool: &ToolDefinition) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": Self::parameters_schema(tool),
            }
        })
    }

    /// Schemas for all tools, keeping registration order.
    pub fn all_tools_schema(tools: &[ToolDefinition]) -> Vec<Value> {
        tools.iter().map(Self::tool_to_schema).collect()
    }
}
