//! LLM configuration from TOML (`[llm]` section)

use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Raw LLM configuration from TOML
///
/// # Example
///
/// ```toml
/// [llm]
/// model = "gpt-4o-mini"
/// temperature = 0.1
/// max_tokens = 1500
/// base_url = "https://api.openai.com/v1"   # any OpenAI-compatible endpoint
/// timeout_secs = 60
/// ```
///
/// The API key is normally supplied through `OPENAI_API_KEY` or
/// `MSA_LLM__API_KEY` rather than written to a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            max_tokens: 1500,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl FileLlmConfig {
    /// The API key, or a configuration error when it is missing or blank.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ConfigError::Configuration(
                    "an LLM API key is required: set OPENAI_API_KEY, MSA_LLM__API_KEY \
                     or llm.api_key in the config file"
                        .to_string(),
                )
            })
    }

    /// Copy with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}
