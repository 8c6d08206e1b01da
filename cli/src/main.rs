//! CLI entrypoint for conclave
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use conclave_application::{
    DecisionConfig, DecisionProgress, DeliberationLogger, GenerateCandidatesInput,
    GenerateCandidatesUseCase, NoProgress, Oracle, RunDecisionUseCase,
};
use conclave_domain::{Candidate, CandidateSet, OutputFormat};
use conclave_infrastructure::{ConfigLoader, FileConfig, JsonlDeliberationLogger, OllamaOracle};
use conclave_presentation::{
    Cli, ConsoleFormatter, DecisionReport, ProgressReporter, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting conclave");

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let file_config = load_config(&cli)?;

    if !file_config.output.color {
        ConsoleFormatter::disable_color();
    }

    // === Dependency Injection ===
    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| file_config.oracle.base_url.clone());
    let oracle = Arc::new(
        OllamaOracle::with_timeout(base_url, file_config.oracle.request_timeout())
            .context("Failed to create the Ollama client")?,
    );

    if cli.list_models {
        let models = oracle
            .available_models()
            .await
            .with_context(|| format!("Could not list models at {}", oracle.base_url()))?;
        for model in models {
            println!("{}", model);
        }
        return Ok(());
    }

    let Some(question) = cli.question.clone() else {
        bail!("Question is required. Run with --help for usage.");
    };

    let decision = decision_config(&cli, &file_config);
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(file_config.output.format)
        .unwrap_or_default();
    let show_progress = !cli.quiet && file_config.output.show_progress;
    // Bars need a terminal; redirected stderr gets plain lines
    let progress: Box<dyn DecisionProgress> = if !show_progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    if show_progress && format != OutputFormat::Json {
        println!();
        println!("Question: {}", question);
        println!("Protocol: {}", decision.protocol.title());
        if let Some(judge) = &decision.judge_model {
            println!("Judge:    {}", judge);
        }
        println!();
    }

    let candidates = match &cli.candidates {
        Some(path) => load_candidates(path)?,
        None => {
            let agents = if cli.agents.is_empty() {
                file_config.agents.parse_members().0
            } else {
                cli.agents.clone()
            };
            if agents.is_empty() {
                bail!(
                    "No agents configured. Pass -a NAME=MODEL, add [agents] to conclave.toml, \
                     or supply --candidates."
                );
            }
            let input = GenerateCandidatesInput::new(question.clone(), agents)
                .with_timeout(file_config.agents.response_timeout());
            GenerateCandidatesUseCase::new(Arc::clone(&oracle))
                .execute_with_progress(input, progress.as_ref())
                .await?
        }
    };

    let mut use_case = RunDecisionUseCase::new(oracle);
    if let Some(path) = &cli.transcript {
        let path = transcript_path(path);
        match JsonlDeliberationLogger::new(&path) {
            Some(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                let logger: Arc<dyn DeliberationLogger> = Arc::new(logger);
                use_case = use_case.with_deliberation_logger(logger);
            }
            None => warn!("Transcript disabled: could not open {}", path.display()),
        }
    }

    let input = decision.to_input(question.clone(), candidates.clone());
    let result = use_case
        .execute_with_progress(input, progress.as_ref())
        .await?;

    let report = DecisionReport {
        question: &question,
        protocol: decision.protocol,
        candidates: &candidates,
        result: &result,
    };
    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&report),
        OutputFormat::Final => ConsoleFormatter::format_final_only(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };

    println!("{}", output);

    Ok(())
}

/// Stderr logging by verbosity, plus daily files under `log_dir` when given
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "conclave.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }

    let config = ConfigLoader::load(cli.config.as_deref())
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            error!("{}", issue.message());
        } else {
            warn!("{}", issue.message());
        }
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("Invalid configuration, see the errors above");
    }
    Ok(config)
}

/// File settings overridden by command-line flags
fn decision_config(cli: &Cli, file_config: &FileConfig) -> DecisionConfig {
    let (mut config, _) = file_config.decision.to_decision_config();
    if let Some(protocol) = cli.protocol {
        config.protocol = protocol;
    }
    if cli.judge.is_some() {
        config = config.with_judge(cli.judge.clone());
    }
    if let Some(retries) = cli.retries {
        config.params = config.params.with_max_retries(retries);
    }
    if let Some(seed) = cli.seed {
        config.params = config.params.with_rng_seed(Some(seed));
    }
    config
}

fn load_candidates(path: &Path) -> Result<CandidateSet> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read candidates from {}", path.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON list of candidates", path.display()))?;

    let (candidates, rejected) = CandidateSet::dedupe(candidates);
    for candidate in rejected {
        warn!("Skipping duplicate or unnamed candidate '{}'", candidate.name);
    }
    if candidates.is_empty() {
        bail!("{} contains no usable candidates", path.display());
    }
    Ok(candidates)
}

/// A directory gets a timestamped file name
fn transcript_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        path.join(format!("conclave-{}.jsonl", stamp))
    } else {
        path.to_path_buf()
    }
}
