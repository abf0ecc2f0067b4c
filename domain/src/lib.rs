//! Domain layer for multisource-agent
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Decision loop
//!
//! A user query is answered by repeatedly asking an LLM capability for an
//! [`AgentDecision`]: either a final answer or a [`ToolCall`]. Each tool
//! invocation is recorded as an [`AgentStep`]; the whole run becomes a
//! [`QueryResult`].
//!
//! ## History
//!
//! Every completed query is folded into a [`HistoryEntry`] kept in a bounded,
//! most-recent-first [`HistoryLog`], which derives [`HistoryStats`] and
//! renders the [`ExportFormat`]s.

pub mod agent;
pub mod core;
pub mod history;
pub mod prompt;
pub mod tool;

// Re-export commonly used types
pub use agent::{AgentDecision, AgentStep, LoopState, QueryResult};
pub use core::{
    error::{DomainError, MAX_QUERY_CHARS, validate_query},
    locale::{ExportLabels, Locale},
};
pub use history::{
    ExportFormat, HistoryEntry, HistoryError, HistoryLog, HistoryStats, KeywordCount,
    KeywordPolicy,
};
pub use prompt::AgentPromptTemplate;
pub use tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{RegistryError, ToolError, ToolResult, ToolResultMetadata},
};
