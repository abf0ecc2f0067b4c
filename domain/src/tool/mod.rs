//! Tool domain module
//!
//! Abstractions for the data-access tools the agent can invoke: a
//! [`ToolDefinition`] (name, description, input schema, risk level) is
//! offered to the LLM, the LLM answers with a [`ToolCall`], and the
//! invocation produces a [`ToolResult`].
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (schema)       │    │ (invocation) │    │ (observation)│
//! └────────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Failures are values, not control flow: a failed [`ToolResult`] carries a
//! [`ToolError`] that the agent loop reports back to the LLM as an
//! observation.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{RegistryError, ToolError, ToolResult, ToolResultMetadata};
