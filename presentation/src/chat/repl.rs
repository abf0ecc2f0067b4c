//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use colored::Colorize;
use multisource_application::{
    HistoryStorePort, LlmGateway, NoAgentProgress, ProcessQueryInput, ProcessQueryUseCase,
    ToolExecutorPort,
};
use multisource_domain::Locale;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Lines kept in the prompt history file
const PROMPT_HISTORY_SIZE: usize = 500;
/// Entries shown by `/history`
const RECENT_ENTRIES: usize = 5;

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl<G, T, H>
where
    G: LlmGateway + 'static,
    T: ToolExecutorPort + 'static,
    H: HistoryStorePort + 'static,
{
    use_case: ProcessQueryUseCase<G, T, H>,
    history: Arc<H>,
    locale: Locale,
    show_progress: bool,
    session_id: String,
}

impl<G, T, H> ChatRepl<G, T, H>
where
    G: LlmGateway + 'static,
    T: ToolExecutorPort + 'static,
    H: HistoryStorePort + 'static,
{
    pub fn new(use_case: ProcessQueryUseCase<G, T, H>, history: Arc<H>, locale: Locale) -> Self {
        Self {
            use_case,
            history,
            locale,
            show_progress: true,
            session_id: format!("chat-{}", std::process::id()),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();

        // Prompt history is best-effort
        if let Some(path) = Self::prompt_history_path() {
            if let Some(parent) = path.parent()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                warn!("Could not create {}: {}", parent.display(), e);
            }
            match FileBackedHistory::with_file(PROMPT_HISTORY_SIZE, path) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!("Prompt history unavailable: {}", e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("msa".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) == ChatAction::Exit {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn prompt_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("multisource-agent").join("prompt_history.txt"))
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│       multisource-agent - Chat Mode         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /stats            - History statistics");
        println!("  /history          - Most recent exchanges");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands.
    pub fn handle_command(&self, cmd: &str) -> ChatAction {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                ChatAction::Exit
            }
            "/help" | "/h" | "/?" => {
                println!();
                Self::print_help();
                ChatAction::Continue
            }
            "/stats" => {
                println!("{}", ConsoleFormatter::format_stats(&self.history.stats()));
                ChatAction::Continue
            }
            "/history" => {
                let entries = self.history.get_history(Some(RECENT_ENTRIES));
                println!(
                    "{}",
                    ConsoleFormatter::format_history(&entries, self.locale)
                );
                ChatAction::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                ChatAction::Continue
            }
        }
    }

    async fn process_question(&self, question: &str) {
        println!();

        let input = ProcessQueryInput::new(question).with_session_id(self.session_id.clone());
        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_progress(input, &progress).await
        } else {
            self.use_case
                .execute_with_progress(input, &NoAgentProgress)
                .await
        };

        match result {
            Ok(response) => println!("{}", ConsoleFormatter::format_response(&response)),
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
        println!();
    }
}
