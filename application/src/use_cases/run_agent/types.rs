//! Type definitions for the RunAgent use case.

use multisource_domain::AgentStep;

/// Input for one run of the decision loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAgentInput {
    pub query: String,
    /// Optional free-form context supplied alongside the query
    pub context: Option<String>,
}

impl RunAgentInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Text presented to the model as the user message.
    pub(super) fn prompt_text(&self) -> String {
        match self.context.as_deref().map(str::trim) {
            Some(context) if !context.is_empty() => {
                format!("{}\n\nContext: {}", self.query, context)
            }
            _ => self.query.clone(),
        }
    }
}

/// How the loop ended, before timing and localization are applied.
pub(super) enum LoopOutcome {
    /// The model produced a final answer
    Answered { answer: String, steps: Vec<AgentStep> },
    /// The iteration cap was reached without a final answer
    Exhausted { steps: Vec<AgentStep> },
    /// The orchestration mechanism itself failed
    Failed { error: String, steps: Vec<AgentStep> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text_appends_context() {
        assert_eq!(RunAgentInput::new("q").prompt_text(), "q");
        assert_eq!(
            RunAgentInput::new("q").with_context("  ").prompt_text(),
            "q"
        );
        assert_eq!(
            RunAgentInput::new("q").with_context("sales team").prompt_text(),
            "q\n\nContext: sales team"
        );
    }
}
