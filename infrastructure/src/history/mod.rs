//! Conversation history persistence

pub mod json_store;

pub use json_store::JsonHistoryStore;
