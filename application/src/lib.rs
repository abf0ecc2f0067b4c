//! Application layer for multisource-agent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    agent_progress::{AgentProgressNotifier, NoAgentProgress},
    data_sources::DataSourceCatalog,
    history_store::HistoryStorePort,
    llm_gateway::{DecisionRequest, GatewayError, LlmGateway},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::data_source_insights::{
    DataSourceInsightsUseCase, DataSourceStats, DocumentStats, ShellStats, SqliteStats,
};
pub use use_cases::process_query::{
    ProcessQueryError, ProcessQueryInput, ProcessQueryUseCase, QueryResponse,
};
pub use use_cases::run_agent::{RunAgentInput, RunAgentUseCase};
