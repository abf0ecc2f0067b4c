//! Progress reporting for the decision loop

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use multisource_application::AgentProgressNotifier;
use multisource_domain::core::string::{single_line, truncate};
use std::time::Duration;

/// Spinner shown while a query is being processed; tool calls are printed
/// above it as they happen.
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new_spinner())
    }

    /// Reporter that draws nothing; state is still tracked.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(spinner: ProgressBar) -> Self {
        spinner.set_style(Self::spinner_style());
        Self { spinner }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn message(&self) -> String {
        self.spinner.message()
    }

    pub fn is_finished(&self) -> bool {
        self.spinner.is_finished()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentProgressNotifier for ProgressReporter {
    fn on_query_start(&self, query: &str) {
        self.spinner.set_prefix("Processing");
        self.spinner
            .set_message(truncate(&single_line(query), 60));
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    fn on_decision_start(&self, iteration: usize) {
        self.spinner
            .set_message(format!("step {}: consulting the model", iteration));
    }

    fn on_tool_start(&self, tool_name: &str, input: &str) {
        self.spinner.println(format!(
            "  {} {} {}",
            "->".cyan(),
            tool_name.bold(),
            truncate(&single_line(input), 80).dimmed()
        ));
        self.spinner.set_message(format!("running {}", tool_name));
    }

    fn on_tool_complete(&self, tool_name: &str, success: bool) {
        if success {
            self.spinner
                .println(format!("  {} {}", "v".green(), tool_name));
        } else {
            self.spinner
                .println(format!("  {} {} (failed)", "x".red(), tool_name));
        }
    }

    fn on_query_complete(&self, _success: bool) {
        self.spinner.finish_and_clear();
    }
}
