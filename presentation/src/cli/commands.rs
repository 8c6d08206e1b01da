//! CLI command definitions

use clap::{Parser, ValueEnum};
use conclave_application::AgentSpec;
use conclave_domain::DecisionProtocol;
use std::path::PathBuf;

/// Output format for decision results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Deliberation log, candidates and final answer
    Full,
    /// Only the final answer and its source
    Final,
    /// JSON output
    Json,
}

impl From<OutputFormat> for conclave_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => conclave_domain::OutputFormat::Full,
            OutputFormat::Final => conclave_domain::OutputFormat::Final,
            OutputFormat::Json => conclave_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for conclave
#[derive(Parser, Debug)]
#[command(name = "conclave")]
#[command(author, version, about = "Let a council of local models vote on the best answer")]
#[command(long_about = r#"
Conclave asks several models the same question and decides between their
answers with a voting protocol:

  none               Aggregate every answer
  arbiter            A judge model picks or writes the answer
  ranked_choice      Agents rank each other (instant runoff)
  judge_and_jury     Ranked vote, reviewed by a judge (mistrials allowed)
  fight_to_the_death Agents nominate each other for elimination
  retirement_lounge  Same tournament, gentler narration

Configuration files are loaded from (in priority order):
1. CONCLAVE_* environment variables
2. --config <path>      Explicit config file
3. ./conclave.toml      Project-level config
4. ~/.config/conclave/config.toml   Global config

Example:
  conclave -a zeus=llama3 -a athena=qwen2.5 -p ranked_choice "Tabs or spaces?"
  conclave -p judge_and_jury --judge llama3:70b "Explain Rust lifetimes"
  conclave --candidates answers.json -p fight_to_the_death "Best sorting algorithm?"
"#)]
pub struct Cli {
    /// The question to decide on
    pub question: Option<String>,

    /// Decision protocol
    #[arg(short, long, value_name = "PROTOCOL", value_parser = parse_protocol)]
    pub protocol: Option<DecisionProtocol>,

    /// Agent as NAME=MODEL (can be specified multiple times)
    #[arg(short, long = "agent", value_name = "NAME=MODEL", value_parser = parse_agent)]
    pub agents: Vec<AgentSpec>,

    /// Model used as judge
    #[arg(long, value_name = "MODEL")]
    pub judge: Option<String>,

    /// JSON file of pre-generated candidates: [{"name", "model", "content"}]
    #[arg(long, value_name = "PATH")]
    pub candidates: Option<PathBuf>,

    /// Mistrials allowed before the judge rules alone
    #[arg(long, value_name = "N")]
    pub retries: Option<usize>,

    /// Seed for tie-breaks and mistrial seeds
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Base URL of the Ollama server
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write a JSONL transcript of the deliberation
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// List the models the server has installed and exit
    #[arg(long)]
    pub list_models: bool,
}

fn parse_protocol(raw: &str) -> Result<DecisionProtocol, String> {
    raw.parse().map_err(|_| {
        let known = DecisionProtocol::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown protocol '{}' (expected one of: {})", raw, known)
    })
}

fn parse_agent(raw: &str) -> Result<AgentSpec, String> {
    let (name, model) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=MODEL, got '{}'", raw))?;
    let (name, model) = (name.trim(), model.trim());
    if name.is_empty() || model.is_empty() {
        return Err(format!("expected NAME=MODEL, got '{}'", raw));
    }
    Ok(AgentSpec::new(name, model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::EliminationSkin;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "conclave",
            "-p",
            "Fight to the Death",
            "-a",
            "Zeus=llama3",
            "-a",
            "Athena = qwen2.5:14b",
            "--judge",
            "llama3:70b",
            "--seed",
            "7",
            "-o",
            "json",
            "-vv",
            "Tabs or spaces?",
        ])
        .unwrap();

        assert_eq!(cli.question.as_deref(), Some("Tabs or spaces?"));
        assert_eq!(
            cli.protocol,
            Some(DecisionProtocol::Elimination(EliminationSkin::BattleRoyale))
        );
        assert_eq!(
            cli.agents,
            vec![
                AgentSpec::new("Zeus", "llama3"),
                AgentSpec::new("Athena", "qwen2.5:14b")
            ]
        );
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_protocol() {
        let err = Cli::try_parse_from(["conclave", "-p", "coin_flip", "q"]).unwrap_err();
        assert!(err.to_string().contains("unknown protocol"));
    }

    #[test]
    fn test_rejects_malformed_agent() {
        assert!(Cli::try_parse_from(["conclave", "-a", "llama3", "q"]).is_err());
        assert!(Cli::try_parse_from(["conclave", "-a", "=llama3", "q"]).is_err());
    }

    #[test]
    fn test_output_format_converts_to_domain() {
        let format: conclave_domain::OutputFormat = OutputFormat::Full.into();
        assert_eq!(format, conclave_domain::OutputFormat::Full);
    }
}
