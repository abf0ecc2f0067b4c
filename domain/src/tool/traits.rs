//! Tool domain traits
//!
//! Pure validation of tool calls against their definitions.
//! The async `ToolExecutorPort` lives in the application layer.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolError;

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError>;
}

/// Checks that every required parameter is present and no unknown
/// parameter was supplied.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), ToolError> {
        for param in definition.required_parameters() {
            if !call.arguments.contains_key(&param.name) {
                return Err(ToolError::InvalidArgument(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                )));
            }
        }

        for arg_name in call.arguments.keys() {
            if !definition.parameters.iter().any(|p| &p.name == arg_name) {
                return Err(ToolError::InvalidArgument(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{RiskLevel, ToolParameter};

    fn definition() -> ToolDefinition {
        ToolDefinition::new("document_search", "search", RiskLevel::Low)
            .with_parameter(ToolParameter::new("filename", "file", true))
            .with_parameter(ToolParameter::new("search_term", "term", false))
    }

    #[test]
    fn test_validator_missing_required() {
        let err = DefaultToolValidator
            .validate(&ToolCall::new("document_search"), &definition())
            .unwrap_err();
        assert!(err.to_string().contains("Missing required parameter 'filename'"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let call = ToolCall::new("document_search")
            .with_arg("filename", "a.txt")
            .with_arg("path", "/etc");
        let err = DefaultToolValidator.validate(&call, &definition()).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert!(err.to_string().contains("Unknown parameter 'path'"));
    }

    #[test]
    fn test_validator_valid_call() {
        let call = ToolCall::new("document_search").with_arg("filename", "a.txt");
        assert!(DefaultToolValidator.validate(&call, &definition()).is_ok());
    }
}
