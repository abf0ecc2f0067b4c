//! Prompt templates for the agent

use crate::core::locale::Locale;
use crate::tool::entities::ToolDefinition;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt listing the available tools.
    pub fn system(agent_name: &str, locale: Locale, tools: &[ToolDefinition]) -> String {
        let tool_descriptions = tools
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let params = t
                    .parameters
                    .iter()
                    .map(|p| {
                        let required = if p.required { " (required)" } else { "" };
                        format!("    - {}: {}{}", p.name, p.description, required)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                let risk = if t.is_high_risk() { " (high risk)" } else { "" };
                format!("{}. **{}**{}: {}\n{}", i + 1, t.name, risk, t.description, params)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"You are {agent_name}, an AI assistant that answers questions using multiple data sources.

You have access to the following tools:

{tool_descriptions}

IMPORTANT INSTRUCTIONS:

- Always analyze the user's question to decide which tool is most appropriate
- For questions about structured data, use the database query tool
- For questions about document content, use the document search tool
- To fetch external data or run system commands, use the shell command tool
- You may combine information from several sources when needed
- If a tool returns an error, read it and adjust your next call instead of repeating it
- Always give clear and helpful answers in {language}
- If you are unsure which tool to use, explain your reasoning to the user

Be helpful and precise, and always explain how you obtained the information."#,
            agent_name = agent_name,
            tool_descriptions = tool_descriptions,
            language = locale.language_name(),
        )
    }
}
