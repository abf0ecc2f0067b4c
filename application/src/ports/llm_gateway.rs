//! LLM Gateway port
//!
//! Defines the interface for consulting the LLM capability. The model is
//! treated as opaque: given the conversation so far and the tool schemas,
//! it returns an [`AgentDecision`].

use async_trait::async_trait;
use multisource_domain::{AgentDecision, AgentStep, ToolDefinition};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Everything the capability sees at one iteration of the decision loop.
#[derive(Debug, Clone, Copy)]
pub struct DecisionRequest<'a> {
    pub system_prompt: &'a str,
    /// The user's query, including any free-form context
    pub query: &'a str,
    /// Steps taken so far, oldest first
    pub steps: &'a [AgentStep],
    /// Available tools, in registration order
    pub tools: &'a [ToolDefinition],
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Ask the model for the next decision.
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<AgentDecision, GatewayError>;
}
