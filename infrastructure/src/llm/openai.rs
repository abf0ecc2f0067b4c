//! OpenAI-compatible chat completion gateway
//!
//! One `POST {base_url}/chat/completions` per decision. The accumulated
//! steps are replayed as assistant tool calls followed by tool messages, so
//! the model always sees the whole exchange for the current query.

use crate::config::FileLlmConfig;
use crate::tools::JsonSchemaToolConverter;
use async_trait::async_trait;
use multisource_application::ports::llm_gateway::{DecisionRequest, GatewayError, LlmGateway};
use multisource_domain::{AgentDecision, ToolCall};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Sampling and endpoint settings for [`OpenAiGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout: Duration,
}

impl From<&FileLlmConfig> for OpenAiSettings {
    fn from(config: &FileLlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

pub struct OpenAiGateway {
    client: Client,
    api_key: String,
    settings: OpenAiSettings,
}

impl OpenAiGateway {
    pub fn new(api_key: impl Into<String>, settings: OpenAiSettings) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            settings,
        })
    }

    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<AgentDecision, GatewayError> {
        let body = build_request_body(&self.settings, request);
        debug!(
            model = %self.settings.model,
            steps = request.steps.len(),
            "Requesting decision"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else if e.is_connect() {
                    GatewayError::ConnectionError(e.to_string())
                } else {
                    GatewayError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Chat completion failed");
            return Err(GatewayError::RequestFailed(format!("{} - {}", status, body)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        parse_response(&payload)
    }
}

/// Chat completion request body for one decision.
pub fn build_request_body(settings: &OpenAiSettings, request: &DecisionRequest<'_>) -> Value {
    let mut messages = vec![
        json!({ "role": "system", "content": request.system_prompt }),
        json!({ "role": "user", "content": request.query }),
    ];

    for (i, step) in request.steps.iter().enumerate() {
        let call_id = format!("call_{}", i + 1);
        messages.push(json!({
            "role": "assistant",
            "content": Value::Null,
            "tool_calls": [{
                "id": call_id,
                "type": "function",
                "function": {
                    "name": step.tool_name,
                    "arguments": step.tool_input.to_string(),
                }
            }]
        }));
        messages.push(json!({
            "role": "tool",
            "tool_call_id": call_id,
            "content": step.observation,
        }));
    }

    let mut body = json!({
        "model": settings.model,
        "temperature": settings.temperature,
        "max_tokens": settings.max_tokens,
        "messages": messages,
    });
    if !request.tools.is_empty() {
        body["tools"] = Value::Array(JsonSchemaToolConverter::all_tools_schema(request.tools));
        body["tool_choice"] = json!("auto");
    }
    body
}

/// Turn the first choice of a chat completion into a decision.
pub fn parse_response(payload: &Value) -> Result<AgentDecision, GatewayError> {
    let message = payload
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| GatewayError::InvalidResponse("response has no choices".to_string()))?;

    if let Some(function) = message
        .get("tool_calls")
        .and_then(|calls| calls.get(0))
        .and_then(|call| call.get("function"))
    {
        let name = function
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::InvalidResponse("tool call without a name".to_string()))?;
        let raw_arguments = function
            .get("arguments")
            .and_then(Value::as_str)
            .unwrap_or("{}");

        // Text sent alongside a tool call explains why the tool was chosen
        let mut call = parse_tool_call(name, raw_arguments);
        if let Some(content) = message.get("content").and_then(Value::as_str)
            && !content.trim().is_empty()
        {
            call = call.with_reasoning(content);
        }
        return Ok(AgentDecision::ToolCall(call));
    }

    message
        .get("content")
        .and_then(Value::as_str)
        .map(|content| AgentDecision::FinalAnswer(content.to_string()))
        .ok_or_else(|| {
            GatewayError::InvalidResponse("response has neither content nor tool calls".to_string())
        })
}

/// Arguments that are not a JSON object are passed through as `input`.
fn parse_tool_call(name: &str, raw_arguments: &str) -> ToolCall {
    let call = ToolCall::new(name);
    match serde_json::from_str::<Value>(raw_arguments) {
        Ok(Value::Object(arguments)) => arguments
            .into_iter()
            .fold(call, |call, (key, value)| call.with_arg(key, value)),
        _ => call.with_arg("input", raw_arguments),
    }
}
