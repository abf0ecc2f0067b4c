//! LLM capability adapters

pub mod openai;

pub use openai::{OpenAiGateway, OpenAiSettings, build_request_body, parse_response};
