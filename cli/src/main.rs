//! CLI entrypoint for agent-arena
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use arena_application::{
    CompositeProgress, DomainClassifier, LearningStore, NoProgress, PersistenceSink,
    ProgressNotifier, RaceHistory, RunRaceInput, RunRaceUseCase,
};
use arena_infrastructure::{
    ConfigLoader, FileConfig, FileLearningStore, FilePersistenceSink, KeywordClassifier,
    LlmAgentExecutor, OpenAiCompatGateway,
};
use arena_presentation::{
    Cli, ConsoleFormatter, LogProgress, OutputFormat, ProgressReporter, SimpleProgress,
};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LEARNING_SNAPSHOT: &str = "learning.json";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting agent-arena");

    let Some(prompt) = cli.prompt_text().map(str::to_string) else {
        bail!("A task prompt is required. Run with --help for usage.");
    };

    // === Configuration ===
    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&cli, &mut file_config);

    for issue in file_config.validate() {
        if !issue.is_error() {
            warn!("{}", issue);
        }
    }
    let config = file_config.to_arena_config()?;

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiCompatGateway::from_file_config(&file_config.provider)?);
    let executor = Arc::new(LlmAgentExecutor::new(gateway.clone()));

    let data_dir = file_config.storage.resolve_data_dir();
    let store = match &data_dir {
        Some(dir) if file_config.storage.persist => {
            Arc::new(FileLearningStore::open(dir.join(LEARNING_SNAPSHOT))?)
        }
        _ => Arc::new(FileLearningStore::in_memory()),
    };

    let mut use_case = RunRaceUseCase::new(
        gateway,
        executor,
        store.clone() as Arc<dyn LearningStore>,
        store as Arc<dyn RaceHistory>,
        config,
    );
    if let Some(dir) = &data_dir
        && file_config.storage.persist
    {
        let sink = FilePersistenceSink::new(dir)?;
        info!("Persisting races under {}", sink.root().display());
        use_case = use_case.with_persistence(Arc::new(sink) as Arc<dyn PersistenceSink>);
    }

    let category = match cli.category {
        Some(category) => category,
        None => {
            let category = KeywordClassifier::new().classify(&prompt);
            info!("Classified task as {}", category);
            category
        }
    };
    let input = RunRaceInput::new(prompt, category).with_overrides(cli.plan_overrides());

    let progress = progress_for(&cli);
    let outcome = use_case.execute_with_progress(input, progress).await?;

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&outcome),
        OutputFormat::Winner => ConsoleFormatter::format_winner_only(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };

    println!("{}", output);

    Ok(())
}

/// Console logging filtered by `-v`, plus an optional plain-text log file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(console).init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    let file = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(EnvFilter::new(if verbose == 0 { "info" } else { level }));

    tracing_subscriber::registry().with(console).with(file).init();
    Ok(Some(guard))
}

/// Command-line switches beat file and environment settings
fn apply_cli_overrides(cli: &Cli, config: &mut FileConfig) {
    if !cli.persona.is_empty() {
        config.agents.personas = cli.persona.iter().map(|p| p.to_string()).collect();
    }
    if !cli.model.is_empty() {
        config.agents.models = cli.model.clone();
    }
    if let Some(model) = &cli.judge_model {
        config.judge.model = Some(model.clone());
    }
    if cli.no_learning {
        config.learning.enabled = false;
    }
    if cli.no_gate {
        config.gate.enabled = false;
    }
}

fn progress_for(cli: &Cli) -> Arc<dyn ProgressNotifier> {
    let console: Option<Arc<dyn ProgressNotifier>> = if cli.quiet {
        None
    } else if std::io::stderr().is_terminal() {
        Some(Arc::new(if cli.verbose > 0 {
            ProgressReporter::verbose()
        } else {
            ProgressReporter::new()
        }))
    } else if cli.output != OutputFormat::Json {
        Some(Arc::new(SimpleProgress::new(cli.verbose > 0)))
    } else {
        None
    };

    match (console, cli.log_file.is_some()) {
        (Some(console), true) => {
            let log: Arc<dyn ProgressNotifier> = Arc::new(LogProgress);
            Arc::new(CompositeProgress::new(vec![console, log]))
        }
        (Some(console), false) => console,
        (None, true) => Arc::new(LogProgress),
        (None, false) => Arc::new(NoProgress),
    }
}
