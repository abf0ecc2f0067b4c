//! Execution parameters - use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! decision loop in [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase).

use multisource_domain::Locale;
use serde::{Deserialize, Serialize};

/// Decision loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of decisions before the loop gives up.
    pub max_iterations: usize,
    /// Name the agent introduces itself with in the system prompt.
    pub agent_name: String,
    /// Language of user-facing failure messages and answers.
    pub locale: Locale,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            agent_name: "MultiSourceAgent".to_string(),
            locale: Locale::default(),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}
