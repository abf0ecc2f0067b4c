//! Agent domain entities

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// State of the decision loop
///
/// ```text
/// AwaitingDecision ──▶ ToolCall ──▶ Observation ──▶ AwaitingDecision
///        │
///        └──────────▶ FinalAnswer (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopState {
    AwaitingDecision,
    ToolCall,
    Observation,
    FinalAnswer,
}

impl LoopState {
    pub fn as_str(&self) -> &str {
        match self {
            LoopState::AwaitingDecision => "awaiting_decision",
            LoopState::ToolCall => "tool_call",
            LoopState::Observation => "observation",
            LoopState::FinalAnswer => "final_answer",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::FinalAnswer)
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the LLM capability decided at one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentDecision {
    /// A natural-language answer; ends the loop
    FinalAnswer(String),
    /// A request to invoke a tool
    ToolCall(ToolCall),
}

impl AgentDecision {
    /// State the loop moves to after this decision.
    pub fn next_state(&self) -> LoopState {
        match self {
            AgentDecision::FinalAnswer(_) => LoopState::FinalAnswer,
            AgentDecision::ToolCall(_) => LoopState::ToolCall,
        }
    }
}

/// One iteration of the decision loop: the tool invoked, its input and
/// what it returned (or the error it reported).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub tool_name: String,
    pub tool_input: serde_json::Value,
    pub observation: String,
}

impl AgentStep {
    pub fn new(call: &ToolCall, observation: impl Into<String>) -> Self {
        Self {
            tool_name: call.tool_name.clone(),
            tool_input: call.arguments_json(),
            observation: observation.into(),
        }
    }
}

/// Outcome of processing one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub steps: Vec<AgentStep>,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    pub fn answered(answer: impl Into<String>, steps: Vec<AgentStep>, duration_ms: u64) -> Self {
        Self {
            answer: answer.into(),
            steps,
            success: true,
            duration_ms,
            error: None,
        }
    }

    pub fn failed(
        answer: impl Into<String>,
        steps: Vec<AgentStep>,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            answer: answer.into(),
            steps,
            success: false,
            duration_ms,
            error: Some(error.into()),
        }
    }

    /// Names of the tools used, in invocation order.
    pub fn tools_used(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.tool_name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_next_state() {
        assert_eq!(
            AgentDecision::FinalAnswer("ok".into()).next_state(),
            LoopState::FinalAnswer
        );
        assert!(LoopState::FinalAnswer.is_terminal());
        assert_eq!(
            AgentDecision::ToolCall(ToolCall::new("sqlite_query")).next_state(),
            LoopState::ToolCall
        );
    }

    #[test]
    fn test_step_records_arguments() {
        let call = ToolCall::new("document_search").with_arg("filename", "a.txt");
        let step = AgentStep::new(&call, "found");
        assert_eq!(step.tool_name, "document_search");
        assert_eq!(step.tool_input["filename"], "a.txt");
    }

    #[test]
    fn test_query_result_serialization_omits_missing_error() {
        let result = QueryResult::answered("42", vec![], 5);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["success"], true);

        let failed = QueryResult::failed("sorry", vec![], 5, "boom");
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(failed.tools_used().is_empty());
    }
}
