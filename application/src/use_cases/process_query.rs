//! Process Query use case
//!
//! The request/response contract offered to transports: validate the query,
//! run the decision loop, record the exchange in history, and return a
//! [`QueryResponse`].

use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::history_store::HistoryStorePort;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::run_agent::{RunAgentInput, RunAgentUseCase};
use chrono::{SecondsFormat, Utc};
use multisource_domain::{AgentStep, DomainError, validate_query};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced to the transport. Agent failures are not errors: they
/// come back as a response with `success = false`.
#[derive(Error, Debug)]
pub enum ProcessQueryError {
    #[error(transparent)]
    InvalidQuery(#[from] DomainError),
}

/// A query as delivered by a transport
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessQueryInput {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ProcessQueryInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Response returned to the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub steps: Vec<AgentStep>,
    pub success: bool,
    pub duration_ms: u64,
    pub history_id: String,
    /// ISO-8601 UTC time the response was produced
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ProcessQueryUseCase<G, T, H>
where
    G: LlmGateway + 'static,
    T: ToolExecutorPort + 'static,
    H: HistoryStorePort + 'static,
{
    run_agent: RunAgentUseCase<G, T>,
    history: Arc<H>,
}

impl<G, T, H> ProcessQueryUseCase<G, T, H>
where
    G: LlmGateway + 'static,
    T: ToolExecutorPort + 'static,
    H: HistoryStorePort + 'static,
{
    pub fn new(run_agent: RunAgentUseCase<G, T>, history: Arc<H>) -> Self {
        Self { run_agent, history }
    }

    pub async fn execute(&self, input: ProcessQueryInput) -> Result<QueryResponse, ProcessQueryError> {
        self.execute_with_progress(input, &NoAgentProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: ProcessQueryInput,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<QueryResponse, ProcessQueryError> {
        let query = validate_query(&input.query)?.to_string();
        if let Some(session_id) = &input.session_id {
            debug!(session_id = %session_id, "Query received");
        }

        let mut agent_input = RunAgentInput::new(query.clone());
        if let Some(context) = input.context {
            agent_input = agent_input.with_context(context);
        }

        let result = self
            .run_agent
            .execute_with_progress(agent_input, progress)
            .await;

        let now = Utc::now();
        let history_id = self.history.add_entry(
            &query,
            &result.answer,
            now,
            result.duration_ms,
            result.success,
        );
        info!(
            history_id = %history_id,
            success = result.success,
            duration_ms = result.duration_ms,
            "Query processed"
        );

        Ok(QueryResponse {
            answer: result.answer,
            steps: result.steps,
            success: result.success,
            duration_ms: result.duration_ms,
            history_id,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            error: result.error,
        })
    }
}
