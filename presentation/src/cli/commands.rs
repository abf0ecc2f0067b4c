//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use multisource_domain::ExportFormat;
use std::path::PathBuf;

/// CLI arguments for multisource-agent
#[derive(Parser, Debug)]
#[command(name = "multisource-agent")]
#[command(
    author,
    version,
    about = "Answer questions from SQLite databases, documents and the shell"
)]
#[command(long_about = r#"
multisource-agent answers natural-language questions by letting an LLM call
three tools until it can reply:

  sqlite_query      read-only SQL against *.db files under paths.sqlite
  document_search   read or search *.txt / *.md files under paths.documents
  shell_command     run a shell command (off unless agent.enable_shell_commands)

Every answered query is recorded in the conversation history.

Configuration files are loaded from (in priority order):
1. MSA_* environment variables (MSA_AGENT__MAX_ITERATIONS=5), OPENAI_API_KEY
2. --config <path>     Explicit config file
3. ./multisource.toml  Project-level config
4. ~/.config/multisource-agent/config.toml   Global config

Example:
  multisource-agent ask "Quantos clientes temos na base sales.db?"
  multisource-agent chat
  multisource-agent history export --format md
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask one question
    Ask {
        /// The question (1-1000 characters)
        query: String,

        /// Extra free-form context passed along with the question
        #[arg(long)]
        context: Option<String>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive chat
    Chat,

    /// Browse and manage the conversation history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show which databases and documents are available
    Sources,

    /// Suggest questions based on the available sources
    Suggest,

    /// Invoke a tool directly, without the LLM
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List entries, most recent first
    List {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Entries whose question or answer contains TERM (case-insensitive)
    Search { term: String },
    /// Show one entry
    Show { id: String },
    /// Delete one entry
    Remove { id: String },
    /// Delete every entry
    Clear,
    /// Totals, success rate and frequent keywords
    Stats,
    /// Write the history to a timestamped file in the data directory
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormatArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToolsAction {
    /// List database files
    Databases,
    /// List the tables of one database
    Tables { database: String },
    /// List document files
    Documents,
    /// Run a read-only SQL statement
    Sql { database: String, query: String },
    /// Read a document, or search it with --term
    Doc {
        filename: String,
        #[arg(short, long)]
        term: Option<String>,
    },
    /// Run a shell command (same gating as the agent)
    Shell { command: String },
}

/// Export format accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    Json,
    Txt,
    Md,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Txt => ExportFormat::Txt,
            ExportFormatArg::Md => ExportFormat::Md,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["multisource-agent", "-vv", "ask", "Quantos clientes?", "--json"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Ask { query, json, context }) => {
                assert_eq!(query, "Quantos clientes?");
                assert!(json);
                assert!(context.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_history_export() {
        let cli = Cli::parse_from(["multisource-agent", "history", "export", "--format", "md"]);
        match cli.command {
            Some(Command::History {
                action: HistoryAction::Export { format },
            }) => assert_eq!(ExportFormat::from(format), ExportFormat::Md),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_tools_doc_with_term() {
        let cli = Cli::parse_from([
            "multisource-agent",
            "tools",
            "doc",
            "manual.md",
            "--term",
            "router",
            "--config",
            "custom.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Some(Command::Tools {
                action: ToolsAction::Doc { filename, term },
            }) => {
                assert_eq!(filename, "manual.md");
                assert_eq!(term.as_deref(), Some("router"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
