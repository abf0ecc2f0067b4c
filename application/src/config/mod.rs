//! Application-level configuration.
//!
//! - [`ExecutionParams`] - decision loop control (iteration cap, agent name, locale)

pub mod execution_params;

pub use execution_params::ExecutionParams;
