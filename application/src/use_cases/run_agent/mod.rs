//! Run Agent use case
//!
//! Owns the decision loop:
//!
//! ```text
//! AwaitingDecision ──▶ ToolCall ──▶ Observation ──▶ AwaitingDecision
//!        │
//!        └──────────▶ FinalAnswer
//! ```
//!
//! Each iteration presents the query, the steps taken so far and the full
//! tool list to the [`LlmGateway`]. Tool failures become observations and
//! the loop continues; the loop ends on a final answer or after
//! `max_iterations` decisions. The use case never returns an error: a
//! failure of the gateway itself becomes a `success = false` [`QueryResult`].

mod types;

pub use types::RunAgentInput;

use types::LoopOutcome;

use crate::config::ExecutionParams;
use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::llm_gateway::{DecisionRequest, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use multisource_domain::core::string::truncate;
use multisource_domain::{
    AgentDecision, AgentPromptTemplate, AgentStep, DefaultToolValidator, LoopState, QueryResult,
    RegistryError, ToolCall, ToolValidator,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Use case for answering one query with the tool-using agent
pub struct RunAgentUseCase<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> {
    gateway: Arc<G>,
    tool_executor: Arc<T>,
    params: ExecutionParams,
}

impl<G, T> Clone for RunAgentUseCase<G, T>
where
    G: LlmGateway + 'static,
    T: ToolExecutorPort + 'static,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            params: self.params.clone(),
        }
    }
}

impl<G: LlmGateway + 'static, T: ToolExecutorPort + 'static> RunAgentUseCase<G, T> {
    pub fn new(gateway: Arc<G>, tool_executor: Arc<T>) -> Self {
        Self {
            gateway,
            tool_executor,
            params: ExecutionParams::default(),
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Execute without progress reporting
    pub async fn execute(&self, input: RunAgentInput) -> QueryResult {
        self.execute_with_progress(input, &NoAgentProgress).await
    }

    /// Execute, reporting loop progress to `progress`
    pub async fn execute_with_progress(
        &self,
        input: RunAgentInput,
        progress: &dyn AgentProgressNotifier,
    ) -> QueryResult {
        let started = Instant::now();
        info!("Processing query: \"{}\"", truncate(&input.query, 80));
        progress.on_query_start(&input.query);

        let outcome = self.run_loop(&input, progress).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        let locale = self.params.locale;

        let result = match outcome {
            LoopOutcome::Answered { answer, steps } => {
                info!(steps = steps.len(), duration_ms, "Query answered");
                QueryResult::answered(answer, steps, duration_ms)
            }
            LoopOutcome::Exhausted { steps } => {
                warn!(
                    max_iterations = self.params.max_iterations,
                    "Decision loop reached its iteration cap"
                );
                let message = locale.max_iterations_message(self.params.max_iterations);
                QueryResult::failed(message.clone(), steps, duration_ms, message)
            }
            LoopOutcome::Failed { error, steps } => {
                warn!(error = %error, "Query processing failed");
                QueryResult::failed(locale.failure_message(&error), steps, duration_ms, error)
            }
        };

        progress.on_query_complete(result.success);
        result
    }

    async fn run_loop(
        &self,
        input: &RunAgentInput,
        progress: &dyn AgentProgressNotifier,
    ) -> LoopOutcome {
        let tools = self.tool_executor.definitions();
        let system_prompt =
            AgentPromptTemplate::system(&self.params.agent_name, self.params.locale, tools);
        let query = input.prompt_text();
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 1..=self.params.max_iterations {
            debug!(iteration, state = %LoopState::AwaitingDecision, "Consulting model");
            progress.on_decision_start(iteration);

            let request = DecisionRequest {
                system_prompt: &system_prompt,
                query: &query,
                steps: &steps,
                tools,
            };

            let decision = match self.gateway.decide(&request).await {
                Ok(decision) => decision,
                Err(e) => {
                    return LoopOutcome::Failed {
                        error: e.to_string(),
                        steps,
                    };
                }
            };
            debug!(iteration, state = %decision.next_state(), "Model decided");

            match decision {
                AgentDecision::FinalAnswer(answer) => {
                    return LoopOutcome::Answered { answer, steps };
                }
                AgentDecision::ToolCall(call) => {
                    let step = self.invoke_tool(&call, progress).await;
                    debug!(
                        iteration,
                        tool = %step.tool_name,
                        state = %LoopState::Observation,
                        observation = %truncate(&step.observation, 200),
                        "Recorded step"
                    );
                    steps.push(step);
                }
            }
        }

        LoopOutcome::Exhausted { steps }
    }

    /// Invoke one tool call and turn whatever happens into a step.
    async fn invoke_tool(&self, call: &ToolCall, progress: &dyn AgentProgressNotifier) -> AgentStep {
        let input_text = call.arguments_json().to_string();
        if let Some(reasoning) = &call.reasoning {
            debug!(tool = %call.tool_name, reasoning = %truncate(reasoning, 200), "Model reasoning");
        }
        progress.on_tool_start(&call.tool_name, &input_text);

        let Some(definition) = self.tool_executor.get_tool(&call.tool_name) else {
            warn!(tool = %call.tool_name, "Model requested an unknown tool");
            progress.on_tool_complete(&call.tool_name, false);
            let observation = format!(
                "Error: {}. Available tools: {}",
                RegistryError::UnknownTool(call.tool_name.clone()),
                self.tool_executor.available_tools().join(", ")
            );
            return AgentStep::new(call, observation);
        };

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            progress.on_tool_complete(&call.tool_name, false);
            return AgentStep::new(call, e.to_observation());
        }

        let result = self.tool_executor.execute(call).await;
        progress.on_tool_complete(&call.tool_name, result.is_success());
        AgentStep::new(call, result.observation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use multisource_domain::{Locale, RiskLevel, ToolDefinition, ToolError, ToolParameter, ToolResult};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Infrastructure ====================

    /// A scripted decision for the mock gateway
    #[derive(Debug, Clone)]
    enum Scripted {
        Answer(String),
        Call(ToolCall),
        Error(String),
    }

    /// Gateway that replays scripted decisions in order, then keeps
    /// returning `fallback`.
    struct ScriptedGateway {
        script: Mutex<VecDeque<Scripted>>,
        fallback: Scripted,
        seen_step_counts: Mutex<Vec<usize>>,
    }

    impl ScriptedGateway {
        fn new(script: Vec<Scripted>, fallback: Scripted) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback,
                seen_step_counts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn decide(
            &self,
            request: &DecisionRequest<'_>,
        ) -> Result<AgentDecision, GatewayError> {
            self.seen_step_counts.lock().unwrap().push(request.steps.len());
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.fallback.clone());
            match next {
                Scripted::Answer(a) => Ok(AgentDecision::FinalAnswer(a)),
                Scripted::Call(c) => Ok(AgentDecision::ToolCall(c)),
                Scripted::Error(e) => Err(GatewayError::RequestFailed(e)),
            }
        }
    }

    /// Tool executor with one always-succeeding and one always-failing tool
    struct MockToolExecutor {
        definitions: Vec<ToolDefinition>,
        calls: Mutex<Vec<String>>,
    }

    impl MockToolExecutor {
        fn new() -> Self {
            Self {
                definitions: vec![
                    ToolDefinition::new("lookup", "Look something up", RiskLevel::Low)
                        .with_parameter(ToolParameter::new("key", "Key", true)),
                    ToolDefinition::new("broken", "Always fails", RiskLevel::Low),
                ],
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockToolExecutor {
        fn definitions(&self) -> &[ToolDefinition] {
            &self.definitions
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.calls.lock().unwrap().push(call.tool_name.clone());
            match call.tool_name.as_str() {
                "broken" => ToolResult::failure(
                    "broken",
                    ToolError::QueryExecution("disk on fire".to_string()),
                ),
                _ => ToolResult::success(&call.tool_name, "value=42"),
            }
        }
    }

    fn lookup() -> ToolCall {
        ToolCall::new("lookup").with_arg("key", "answer")
    }

    fn use_case(gateway: ScriptedGateway) -> (RunAgentUseCase<ScriptedGateway, MockToolExecutor>, Arc<ScriptedGateway>, Arc<MockToolExecutor>) {
        let gateway = Arc::new(gateway);
        let tools = Arc::new(MockToolExecutor::new());
        (
            RunAgentUseCase::new(gateway.clone(), tools.clone()),
            gateway,
            tools,
        )
    }

    // ==================== Flow Tests ====================

    #[tokio::test]
    async fn test_direct_final_answer() {
        let (uc, _, tools) = use_case(ScriptedGateway::new(
            vec![],
            Scripted::Answer("Olá!".to_string()),
        ));

        let result = uc.execute(RunAgentInput::new("oi")).await;

        assert!(result.success);
        assert_eq!(result.answer, "Olá!");
        assert!(result.steps.is_empty());
        assert!(result.error.is_none());
        assert!(tools.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let (uc, gateway, _) = use_case(ScriptedGateway::new(
            vec![Scripted::Call(lookup())],
            Scripted::Answer("The answer is 42".to_string()),
        ));

        let result = uc.execute(RunAgentInput::new("what is it?")).await;

        assert!(result.success);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].tool_name, "lookup");
        assert_eq!(result.steps[0].tool_input["key"], "answer");
        assert_eq!(result.steps[0].observation, "value=42");
        // the second decision saw the first step
        assert_eq!(*gateway.seen_step_counts.lock().unwrap(), vec![0, 1]);
    }

    #[tokio::test]
    async fn test_loop_is_bounded_by_max_iterations() {
        let (uc, _, tools) = use_case(ScriptedGateway::new(vec![], Scripted::Call(lookup())));

        let result = uc.execute(RunAgentInput::new("loop forever")).await;

        assert!(!result.success);
        assert_eq!(result.steps.len(), 10);
        assert_eq!(tools.calls.lock().unwrap().len(), 10);
        assert!(result.answer.contains("(10)"));
    }

    #[tokio::test]
    async fn test_custom_iteration_cap() {
        let (uc, _, _) = use_case(ScriptedGateway::new(vec![], Scripted::Call(lookup())));
        let uc = uc.with_params(
            ExecutionParams::default()
                .with_max_iterations(3)
                .with_locale(Locale::En),
        );

        let result = uc.execute(RunAgentInput::new("q")).await;

        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.answer, "Could not finish the answer: max iterations reached (3).");
    }

    #[tokio::test]
    async fn test_tool_failure_becomes_observation() {
        let (uc, _, _) = use_case(ScriptedGateway::new(
            vec![Scripted::Call(ToolCall::new("broken"))],
            Scripted::Answer("recovered".to_string()),
        ));

        let result = uc.execute(RunAgentInput::new("q")).await;

        assert!(result.success);
        assert_eq!(result.answer, "recovered");
        assert_eq!(
            result.steps[0].observation,
            "Error: [EXECUTION_FAILED] Query failed: disk on fire"
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_observation() {
        let (uc, _, tools) = use_case(ScriptedGateway::new(
            vec![Scripted::Call(ToolCall::new("teleport"))],
            Scripted::Answer("done".to_string()),
        ));

        let result = uc.execute(RunAgentInput::new("q")).await;

        assert!(result.success);
        assert!(result.steps[0].observation.contains("Unknown tool: teleport"));
        assert!(result.steps[0].observation.contains("lookup, broken"));
        assert!(tools.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_not_executed() {
        let (uc, _, tools) = use_case(ScriptedGateway::new(
            vec![Scripted::Call(ToolCall::new("lookup"))],
            Scripted::Answer("done".to_string()),
        ));

        let result = uc.execute(RunAgentInput::new("q")).await;

        assert!(result.steps[0].observation.starts_with("Error: [INVALID_ARGUMENT]"));
        assert!(tools.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_converted() {
        let (uc, _, _) = use_case(ScriptedGateway::new(
            vec![Scripted::Call(lookup()), Scripted::Error("HTTP 500".to_string())],
            Scripted::Answer("unreachable".to_string()),
        ));

        let result = uc.execute(RunAgentInput::new("q")).await;

        assert!(!result.success);
        assert!(result
            .answer
            .starts_with("Desculpe, ocorreu um erro ao processar sua pergunta: "));
        assert_eq!(result.error.as_deref(), Some("Request failed: HTTP 500"));
        assert_eq!(result.steps.len(), 1);
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl AgentProgressNotifier for RecordingProgress {
        fn on_query_start(&self, _query: &str) {
            self.events.lock().unwrap().push("start".into());
        }
        fn on_decision_start(&self, iteration: usize) {
            self.events.lock().unwrap().push(format!("decide:{}", iteration));
        }
        fn on_tool_start(&self, tool_name: &str, _input: &str) {
            self.events.lock().unwrap().push(format!("tool:{}", tool_name));
        }
        fn on_tool_complete(&self, tool_name: &str, success: bool) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}:{}", tool_name, success));
        }
        fn on_query_complete(&self, success: bool) {
            self.events.lock().unwrap().push(format!("end:{}", success));
        }
    }

    #[tokio::test]
    async fn test_progress_callbacks_order() {
        let (uc, _, _) = use_case(ScriptedGateway::new(
            vec![Scripted::Call(lookup())],
            Scripted::Answer("ok".to_string()),
        ));
        let progress = RecordingProgress::default();

        uc.execute_with_progress(RunAgentInput::new("q"), &progress)
            .await;

        assert_eq!(
            *progress.events.lock().unwrap(),
            vec![
                "start",
                "decide:1",
                "tool:lookup",
                "done:lookup:true",
                "decide:2",
                "end:true"
            ]
        );
    }
}
