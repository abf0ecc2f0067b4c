//! Console output formatter for agent results, history and data sources

use colored::Colorize;
use multisource_application::{DataSourceStats, QueryResponse};
use multisource_domain::core::string::{single_line, truncate};
use multisource_domain::{AgentStep, HistoryEntry, HistoryStats, Locale, ToolResult};
use serde::Serialize;

/// Longest observation shown per step in the answer view
const OBSERVATION_PREVIEW: usize = 160;
/// Longest answer shown per entry in the history list
const ANSWER_PREVIEW: usize = 100;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Answer, the steps that led to it and timing.
    pub fn format_response(response: &QueryResponse) -> String {
        let mut output = String::new();

        if response.success {
            output.push_str(&format!("{}\n\n", "=== Answer ===".cyan().bold()));
        } else {
            output.push_str(&format!("{}\n\n", "=== Answer (failed) ===".red().bold()));
        }
        output.push_str(&response.answer);
        output.push('\n');

        if !response.steps.is_empty() {
            output.push_str(&Self::section_header("Steps"));
            output.push_str(&Self::format_steps(&response.steps));
        }

        if let Some(error) = &response.error {
            output.push_str(&format!("\n{} {}\n", "Error:".red().bold(), error));
        }

        output.push_str(&format!(
            "\n{}\n",
            format!(
                "{} ms · {} step(s) · history {}",
                response.duration_ms,
                response.steps.len(),
                response.history_id
            )
            .dimmed()
        ));
        output
    }

    pub fn format_steps(steps: &[AgentStep]) -> String {
        steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                format!(
                    "{}. {} {}\n{}\n",
                    i + 1,
                    step.tool_name.yellow().bold(),
                    step.tool_input,
                    Self::indent(
                        &truncate(&single_line(&step.observation), OBSERVATION_PREVIEW),
                        "   "
                    )
                    .dimmed()
                )
            })
            .collect()
    }

    /// Pretty JSON, or `{}` if the value cannot be serialized.
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// One block per entry, most recent first.
    pub fn format_history(entries: &[HistoryEntry], locale: Locale) -> String {
        if entries.is_empty() {
            return format!("{}\n", "No history entries.".dimmed());
        }

        entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {} {}\n   {} {}\n   {} {}\n",
                    entry.status_glyph(),
                    entry.local_timestamp(locale.datetime_format()).bold(),
                    entry.id.dimmed(),
                    "Q:".cyan(),
                    single_line(&entry.query),
                    "A:".cyan(),
                    truncate(&single_line(&entry.response), ANSWER_PREVIEW)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_entry(entry: &HistoryEntry, locale: Locale) -> String {
        let labels = locale.labels();
        format!(
            "{} {}\n{} {}\n{} {} ms\n\n{}\n{}\n\n{}\n{}\n",
            entry.status_glyph(),
            entry.local_timestamp(locale.datetime_format()).bold(),
            "id:".dimmed(),
            entry.id,
            "duration:".dimmed(),
            entry.duration_ms,
            format!("{}:", labels.question).cyan().bold(),
            entry.query,
            format!("{}:", labels.answer).cyan().bold(),
            entry.response
        )
    }

    pub fn format_stats(stats: &HistoryStats) -> String {
        let mut output = Self::header("History Statistics");
        output.push('\n');
        output.push_str(&format!("{:<14} {}\n", "Total:", stats.total));
        output.push_str(&format!("{:<14} {}\n", "Successful:", stats.successful.to_string().green()));
        output.push_str(&format!("{:<14} {}\n", "Failed:", stats.failed.to_string().red()));
        output.push_str(&format!("{:<14} {}%\n", "Success rate:", stats.success_rate));
        output.push_str(&format!("{:<14} {}\n", "Today:", stats.today_count));

        if let Some(oldest) = &stats.oldest_entry_timestamp {
            output.push_str(&format!("{:<14} {}\n", "Oldest:", oldest));
        }
        if let Some(newest) = &stats.newest_entry_timestamp {
            output.push_str(&format!("{:<14} {}\n", "Newest:", newest));
        }

        if !stats.top_keywords.is_empty() {
            output.push_str(&Self::section_header("Top keywords"));
            for keyword in &stats.top_keywords {
                output.push_str(&format!("  {:<20} {}\n", keyword.word, keyword.count));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_sources(stats: &DataSourceStats) -> String {
        let mut output = Self::header("Data Sources");
        output.push('\n');

        output.push_str(&format!(
            "{} ({})\n",
            "SQLite databases".cyan().bold(),
            stats.sqlite.count
        ));
        output.push_str(&Self::bullet_list(&stats.sqlite.databases));

        output.push_str(&format!(
            "\n{} ({})\n",
            "Documents".cyan().bold(),
            stats.documents.count
        ));
        output.push_str(&Self::bullet_list(&stats.documents.files));

        let shell = if stats.shell.enabled {
            "enabled".green()
        } else {
            "disabled".yellow()
        };
        output.push_str(&format!("\n{} {}\n", "Shell commands:".cyan().bold(), shell));

        output.push_str(&Self::footer());
        output
    }

    pub fn format_suggestions(suggestions: &[String]) -> String {
        if suggestions.is_empty() {
            return format!("{}\n", "No data sources found to suggest questions about.".dimmed());
        }
        suggestions
            .iter()
            .enumerate()
            .map(|(i, question)| format!("{}. {}\n", i + 1, question))
            .collect()
    }

    /// Output of a direct tool invocation, or its error in red.
    pub fn format_tool_result(result: &ToolResult) -> String {
        match result.output() {
            Some(output) if result.is_success() => format!("{}\n", output),
            _ => format!("{}\n", result.observation().red()),
        }
    }

    pub fn bullet_list(items: &[String]) -> String {
        if items.is_empty() {
            return format!("  {}\n", "(none)".dimmed());
        }
        items.iter().map(|item| format!("  * {}\n", item)).collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use multisource_application::{DocumentStats, ShellStats, SqliteStats};
    use multisource_domain::{ToolCall, ToolError};

    fn plain() {
        colored::control::set_override(false);
    }

    fn response(success: bool) -> QueryResponse {
        let call = ToolCall::new("sqlite_query").with_arg("source_name", "sales.db");
        QueryResponse {
            answer: "Temos 42 clientes.".to_string(),
            steps: vec![AgentStep::new(&call, "{\n  \"row_count\": 42\n}")],
            success,
            duration_ms: 850,
            history_id: "abc-123".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            error: (!success).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn test_format_response() {
        plain();
        let output = ConsoleFormatter::format_response(&response(true));

        assert!(output.starts_with("=== Answer ==="));
        assert!(output.contains("Temos 42 clientes."));
        assert!(output.contains("1. sqlite_query {\"source_name\":\"sales.db\"}"));
        assert!(output.contains("   { \"row_count\": 42 }"));
        assert!(output.contains("850 ms · 1 step(s) · history abc-123"));
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn test_format_failed_response() {
        plain();
        let output = ConsoleFormatter::format_response(&response(false));

        assert!(output.starts_with("=== Answer (failed) ==="));
        assert!(output.contains("Error: boom"));
    }

    #[test]
    fn test_format_history() {
        plain();
        let entries = vec![HistoryEntry::new(
            "id-1",
            Utc::now(),
            "Quantos\nclientes?",
            "São 42.",
            true,
            10,
        )];

        let output = ConsoleFormatter::format_history(&entries, Locale::PtBr);
        assert!(output.contains("id-1"));
        assert!(output.contains("Q: Quantos clientes?"));
        assert!(output.contains("A: São 42."));

        let empty = ConsoleFormatter::format_history(&[], Locale::PtBr);
        assert!(empty.contains("No history entries."));
    }

    #[test]
    fn test_format_entry_uses_locale_labels() {
        plain();
        let entry = HistoryEntry::new("id-1", Utc::now(), "Question", "Answer", false, 10);

        let output = ConsoleFormatter::format_entry(&entry, Locale::PtBr);
        assert!(output.contains("Pergunta:"));
        assert!(output.contains("Resposta:"));
        assert!(output.starts_with("❌"));
    }

    #[test]
    fn test_format_sources() {
        plain();
        let stats = DataSourceStats {
            sqlite: SqliteStats {
                count: 1,
                databases: vec!["sales.db".to_string()],
            },
            documents: DocumentStats::default(),
            shell: ShellStats { enabled: false },
        };

        let output = ConsoleFormatter::format_sources(&stats);
        assert!(output.contains("SQLite databases (1)"));
        assert!(output.contains("  * sales.db"));
        assert!(output.contains("(none)"));
        assert!(output.contains("Shell commands: disabled"));
    }

    #[test]
    fn test_format_tool_result() {
        plain();
        let ok = ToolResult::success("document_search", "{}");
        assert_eq!(ConsoleFormatter::format_tool_result(&ok), "{}\n");

        let failed = ToolResult::failure(
            "document_search",
            ToolError::DocumentNotFound("x.md".to_string()),
        );
        assert_eq!(
            ConsoleFormatter::format_tool_result(&failed),
            "Error: [NOT_FOUND] Document not found: x.md\n"
        );
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
