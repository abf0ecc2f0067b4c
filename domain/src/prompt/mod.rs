//! Prompt domain
//!
//! Templates for the prompts sent to the LLM capability.

pub mod agent;

pub use agent::AgentPromptTemplate;
