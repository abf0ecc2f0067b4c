//! Agent execution progress port.
//!
//! [`AgentProgressNotifier`] is an **output port** that the presentation layer
//! implements to display progress of the decision loop. Every callback has
//! a no-op default, so implementers only override what they display.
//!
//! # Example Implementation
//!
//! ```ignore
//! use multisource_application::ports::agent_progress::AgentProgressNotifier;
//!
//! struct PrintProgress;
//!
//! impl AgentProgressNotifier for PrintProgress {
//!     fn on_tool_start(&self, tool_name: &str, _input: &str) {
//!         println!("-> {}", tool_name);
//!     }
//! }
//! ```

/// Progress notifier for the decision loop.
pub trait AgentProgressNotifier: Send + Sync {
    /// Called once before the first decision ("processing started")
    fn on_query_start(&self, _query: &str) {}

    /// Called before each consultation of the LLM capability (1-based)
    fn on_decision_start(&self, _iteration: usize) {}

    /// Called when a tool is about to be invoked
    fn on_tool_start(&self, _tool_name: &str, _input: &str) {}

    /// Called when a tool returns
    fn on_tool_complete(&self, _tool_name: &str, _success: bool) {}

    /// Called once when the loop exits, whatever the outcome
    fn on_query_complete(&self, _success: bool) {}
}

/// No-op implementation for tests and non-interactive callers.
pub struct NoAgentProgress;

impl AgentProgressNotifier for NoAgentProgress {}
