//! Interactive chat module
//!
//! Provides a line-editor based chat over the query pipeline.

mod repl;

pub use repl::{ChatAction, ChatRepl};
