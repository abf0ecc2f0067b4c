//! Progress reporting while the agent works

pub mod reporter;

pub use reporter::ProgressReporter;
