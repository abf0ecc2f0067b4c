//! CLI entrypoint for multisource-agent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use multisource_application::{
    DataSourceCatalog, DataSourceInsightsUseCase, ExecutionParams, HistoryStorePort,
    ProcessQueryInput, ProcessQueryUseCase, RunAgentUseCase, ToolExecutorPort,
};
use multisource_domain::{Locale, ToolCall};
use multisource_infrastructure::tools::{DOCUMENT_SEARCH, SHELL_COMMAND, SQLITE_QUERY};
use multisource_infrastructure::{
    ConfigLoader, FileConfig, JsonHistoryStore, LocalDataSources, OpenAiGateway, OpenAiSettings,
    ToolRegistry, default_registry,
};
use multisource_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, HistoryAction, ProgressReporter, ToolsAction,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

type QueryUseCase = ProcessQueryUseCase<OpenAiGateway, ToolRegistry, JsonHistoryStore>;

/// Everything built from the configuration that commands share.
struct App {
    config: FileConfig,
    locale: Locale,
    registry: Arc<ToolRegistry>,
    history: Arc<JsonHistoryStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        let config = load_config(&cli)?;
        println!("{}", toml::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    let config = load_config(&cli)?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging(cli.verbose, config.logging.file.then(|| config.paths.log_dir()))?;

    info!("Starting multisource-agent");

    for issue in config.validate() {
        warn!("Config {}: {}", issue.field, issue.message);
    }

    let (locale, _) = config.agent.parse_locale();

    // === Dependency Injection ===
    let registry = Arc::new(default_registry(
        &config.paths,
        config.agent.enable_shell_commands,
        locale,
    )?);
    let history = Arc::new(JsonHistoryStore::open(
        config.paths.history_file(),
        &config.paths.data_dir,
        config.history.max_entries,
        locale,
        config.history.keyword_policy(),
    ));

    let app = App {
        config,
        locale,
        registry,
        history,
    };

    match cli.command {
        Some(Command::Ask {
            query,
            context,
            json,
        }) => run_ask(&app, query, context, json, cli.quiet).await,
        Some(Command::Chat) => run_chat(&app, cli.quiet).await,
        Some(Command::History { action }) => run_history(&app, action),
        Some(Command::Sources) => {
            let stats = app.insights().stats().await;
            print!("{}", ConsoleFormatter::format_sources(&stats));
            Ok(())
        }
        Some(Command::Suggest) => {
            let suggestions = app.insights().suggested_questions().await;
            print!("{}", ConsoleFormatter::format_suggestions(&suggestions));
            Ok(())
        }
        Some(Command::Tools { action }) => run_tools(&app, action).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_without_files()?
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    Ok(config)
}

/// Filter directive for the given `-v` count.
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    }
}

/// Install the stderr subscriber, plus a daily-rolling file when `log_dir` is set.
fn init_logging(verbose: u8, log_dir: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, "multisource-agent.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

impl App {
    /// Query pipeline backed by the configured LLM. Fails without an API key.
    fn query_use_case(&self) -> Result<QueryUseCase> {
        let api_key = self.config.llm.require_api_key()?;
        let gateway = Arc::new(OpenAiGateway::new(
            api_key,
            OpenAiSettings::from(&self.config.llm),
        )?);

        let params = ExecutionParams::default()
            .with_max_iterations(self.config.agent.max_iterations)
            .with_agent_name(self.config.agent.name.clone())
            .with_locale(self.locale);
        let run_agent = RunAgentUseCase::new(gateway, self.registry.clone()).with_params(params);

        Ok(ProcessQueryUseCase::new(run_agent, self.history.clone()))
    }

    fn catalog(&self) -> LocalDataSources {
        LocalDataSources::new(&self.config.paths, self.config.agent.enable_shell_commands)
    }

    fn insights(&self) -> DataSourceInsightsUseCase<LocalDataSources> {
        DataSourceInsightsUseCase::new(Arc::new(self.catalog()), self.locale)
    }
}

async fn run_ask(
    app: &App,
    query: String,
    context: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let use_case = app.query_use_case()?;

    let mut input = ProcessQueryInput::new(query);
    if let Some(context) = context {
        input = input.with_context(context);
    }

    // Execute with or without progress reporting
    let response = if quiet || json {
        use_case.execute(input).await?
    } else {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    if json {
        println!("{}", ConsoleFormatter::format_json(&response));
    } else {
        print!("{}", ConsoleFormatter::format_response(&response));
    }
    Ok(())
}

async fn run_chat(app: &App, quiet: bool) -> Result<()> {
    let repl = ChatRepl::new(app.query_use_case()?, app.history.clone(), app.locale)
        .with_progress(!quiet);
    repl.run().await?;
    Ok(())
}

fn run_history(app: &App, action: HistoryAction) -> Result<()> {
    let history = &app.history;

    match action {
        HistoryAction::List { limit } => {
            print!(
                "{}",
                ConsoleFormatter::format_history(&history.get_history(limit), app.locale)
            );
        }
        HistoryAction::Search { term } => {
            print!(
                "{}",
                ConsoleFormatter::format_history(&history.search(&term), app.locale)
            );
        }
        HistoryAction::Show { id } => match history.get_by_id(&id) {
            Some(entry) => print!("{}", ConsoleFormatter::format_entry(&entry, app.locale)),
            None => bail!("No history entry with id {}", id),
        },
        HistoryAction::Remove { id } => match history.remove(&id) {
            Some(entry) => println!("Removed {}", entry.id),
            None => bail!("No history entry with id {}", id),
        },
        HistoryAction::Clear => {
            history.clear();
            println!("History cleared");
        }
        HistoryAction::Stats => print!("{}", ConsoleFormatter::format_stats(&history.stats())),
        HistoryAction::Export { format } => {
            let path = history.export(format.into())?;
            println!("Exported to {}", path.display());
        }
    }
    Ok(())
}

async fn run_tools(app: &App, action: ToolsAction) -> Result<()> {
    let call = match action {
        ToolsAction::Databases => {
            let databases = app.catalog().list_databases().await;
            print!("{}", ConsoleFormatter::bullet_list(&databases));
            return Ok(());
        }
        ToolsAction::Tables { database } => {
            let tables = app.catalog().list_tables(&database).await?;
            print!("{}", ConsoleFormatter::bullet_list(&tables));
            return Ok(());
        }
        ToolsAction::Documents => {
            let documents = app.catalog().list_documents().await;
            print!("{}", ConsoleFormatter::bullet_list(&documents));
            return Ok(());
        }
        ToolsAction::Sql { database, query } => ToolCall::new(SQLITE_QUERY)
            .with_arg("source_name", database)
            .with_arg("query", query),
        ToolsAction::Doc { filename, term } => {
            let call = ToolCall::new(DOCUMENT_SEARCH).with_arg("filename", filename);
            match term {
                Some(term) => call.with_arg("search_term", term),
                None => call,
            }
        }
        ToolsAction::Shell { command } => ToolCall::new(SHELL_COMMAND).with_arg("command", command),
    };

    let result = app.registry.execute(&call).await;
    print!("{}", ConsoleFormatter::format_tool_result(&result));

    if !result.is_success() {
        bail!("{} failed", call.tool_name);
    }
    Ok(())
}
