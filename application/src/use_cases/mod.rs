//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod data_source_insights;
pub mod process_query;
pub mod run_agent;
