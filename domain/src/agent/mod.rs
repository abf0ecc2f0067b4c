//! Agent domain module
//!
//! Decisions, steps and results of the tool-using decision loop.

pub mod entities;

pub use entities::{AgentDecision, AgentStep, LoopState, QueryResult};
