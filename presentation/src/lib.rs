//! Presentation layer for multisource-agent
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatAction, ChatRepl};
pub use cli::{Cli, Command, ExportFormatArg, HistoryAction, ToolsAction};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
