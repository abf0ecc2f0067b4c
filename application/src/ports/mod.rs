//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_progress;
pub mod data_sources;
pub mod history_store;
pub mod llm_gateway;
pub mod tool_executor;
