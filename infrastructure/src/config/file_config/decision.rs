//! Decision configuration from TOML (`[decision]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [decision]
//! protocol = "judge_and_jury"   # none | arbiter | ranked_choice | judge_and_jury
//!                               # fight_to_the_death | retirement_lounge
//! judge = "llama3:70b"
//! max_retries = 1
//! voter_timeout_secs = 120
//! seed = 42
//! narrative_lines = ["{victim} was sent to the shadow realm."]
//! ```

use super::validation::{ConfigIssue, ConfigValidationError};
use conclave_application::{DecisionConfig, DecisionParams};
use conclave_domain::DecisionProtocol;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDecisionConfig {
    /// Protocol name, identifier or display form
    pub protocol: String,
    /// Judge model for the judge-driven protocols and wipeout recovery
    pub judge: Option<String>,
    pub max_retries: usize,
    /// Per-voter call timeout; omit for no limit
    pub voter_timeout_secs: Option<u64>,
    pub max_parallel_voters: Option<usize>,
    pub excerpt_len: usize,
    pub ballot_temperature: Option<f32>,
    pub nomination_temperature: f32,
    pub verdict_temperature: f32,
    pub mistrial_temperature: f32,
    pub summary_temperature: f32,
    pub seed: Option<u64>,
    /// Custom clean-elimination lines, each with a `{victim}` placeholder
    pub narrative_lines: Vec<String>,
}

impl Default for FileDecisionConfig {
    fn default() -> Self {
        let params = DecisionParams::default();
        Self {
            protocol: DecisionProtocol::default().as_str().to_string(),
            judge: None,
            max_retries: params.max_retries,
            voter_timeout_secs: params.voter_timeout.map(|d| d.as_secs()),
            max_parallel_voters: params.max_parallel_voters,
            excerpt_len: params.excerpt_len,
            ballot_temperature: params.ballot_temperature,
            nomination_temperature: params.nomination_temperature,
            verdict_temperature: params.verdict_temperature,
            mistrial_temperature: params.mistrial_temperature,
            summary_temperature: params.summary_temperature,
            seed: params.rng_seed,
            narrative_lines: params.narrative_lines,
        }
    }
}

impl FileDecisionConfig {
    /// Parse the protocol, falling back to aggregation on unknown values
    pub fn parse_protocol(&self) -> (DecisionProtocol, Vec<ConfigIssue>) {
        match self.protocol.parse() {
            Ok(protocol) => (protocol, Vec::new()),
            Err(_) => (
                DecisionProtocol::default(),
                vec![ConfigIssue::warning(ConfigValidationError::UnknownProtocol(
                    self.protocol.clone(),
                ))],
            ),
        }
    }

    /// Judge model, ignoring blank values
    pub fn judge(&self) -> Option<String> {
        self.judge
            .as_deref()
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .map(String::from)
    }

    pub fn to_params(&self) -> DecisionParams {
        let temperatures = DecisionParams {
            ballot_temperature: self.ballot_temperature,
            nomination_temperature: self.nomination_temperature,
            verdict_temperature: self.verdict_temperature,
            mistrial_temperature: self.mistrial_temperature,
            summary_temperature: self.summary_temperature,
            ..DecisionParams::default()
        };
        temperatures
            .with_max_retries(self.max_retries)
            .with_voter_timeout(self.voter_timeout_secs.map(Duration::from_secs))
            .with_max_parallel_voters(self.max_parallel_voters)
            .with_excerpt_len(self.excerpt_len)
            .with_rng_seed(self.seed)
            .with_narrative_lines(self.narrative_lines.clone())
    }

    pub fn to_decision_config(&self) -> (DecisionConfig, Vec<ConfigIssue>) {
        let (protocol, issues) = self.parse_protocol();
        let config = DecisionConfig::new(protocol)
            .with_judge(self.judge())
            .with_params(self.to_params());
        (config, issues)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (protocol, mut issues) = self.parse_protocol();
        if protocol.requires_judge() && self.judge().is_none() {
            issues.push(ConfigIssue::warning(ConfigValidationError::MissingJudge(
                protocol.title().to_string(),
            )));
        }
        if self.voter_timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(ConfigValidationError::ZeroTimeout(
                "decision.voter_timeout_secs",
            )));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file_config::validation::Severity;
    use conclave_domain::EliminationSkin;

    #[test]
    fn test_defaults_match_params() {
        let config = FileDecisionConfig::default();
        assert_eq!(config.protocol, "none");
        assert_eq!(config.voter_timeout_secs, Some(120));
        assert_eq!(config.excerpt_len, 800);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_display_name_protocol() {
        let config = FileDecisionConfig {
            protocol: "The Retirement Lounge".to_string(),
            ..Default::default()
        };
        let (protocol, issues) = config.parse_protocol();
        assert_eq!(
            protocol,
            DecisionProtocol::Elimination(EliminationSkin::RetirementLounge)
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_protocol_warns() {
        let config = FileDecisionConfig {
            protocol: "coin_flip".to_string(),
            ..Default::default()
        };
        let (protocol, issues) = config.parse_protocol();
        assert_eq!(protocol, DecisionProtocol::Aggregate);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(
            issues[0].error,
            ConfigValidationError::UnknownProtocol("coin_flip".to_string())
        );
    }

    #[test]
    fn test_missing_judge_and_zero_timeout() {
        let config = FileDecisionConfig {
            protocol: "judge_and_jury".to_string(),
            judge: Some("  ".to_string()),
            voter_timeout_secs: Some(0),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            issues[0].error,
            ConfigValidationError::MissingJudge(_)
        ));
        assert!(issues[1].is_error());
    }

    #[test]
    fn test_to_decision_config() {
        let config = FileDecisionConfig {
            protocol: "arbiter".to_string(),
            judge: Some("llama3".to_string()),
            seed: Some(9),
            voter_timeout_secs: None,
            ..Default::default()
        };
        let (decision, issues) = config.to_decision_config();
        assert!(issues.is_empty());
        assert_eq!(decision.protocol, DecisionProtocol::Arbiter);
        assert_eq!(decision.judge_model.as_deref(), Some("llama3"));
        assert_eq!(decision.params.rng_seed, Some(9));
        assert_eq!(decision.params.voter_timeout, None);
    }

    #[test]
    fn test_to_params_carries_every_setting() {
        let config = FileDecisionConfig {
            max_retries: 3,
            voter_timeout_secs: Some(30),
            max_parallel_voters: Some(2),
            excerpt_len: 200,
            ballot_temperature: Some(0.4),
            mistrial_temperature: 0.9,
            narrative_lines: vec!["{victim} walked off.".to_string()],
            ..Default::default()
        };
        let params = config.to_params();

        assert_eq!(params.max_retries, 3);
        assert_eq!(params.voter_timeout, Some(Duration::from_secs(30)));
        assert_eq!(params.max_parallel_voters, Some(2));
        assert_eq!(params.excerpt_len, 200);
        assert_eq!(params.ballot_temperature, Some(0.4));
        assert_eq!(params.mistrial_temperature, 0.9);
        assert_eq!(params.summary_temperature, 0.2);
        assert_eq!(params.narrative_lines, vec!["{victim} walked off."]);
    }
}
