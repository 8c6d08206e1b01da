//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod decision;
mod oracle;
mod output;
mod validation;

pub use agents::{FileAgent, FileAgentsConfig};
pub use decision::FileDecisionConfig;
pub use oracle::FileOracleConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use validation::{ConfigIssue, ConfigValidationError, Severity};

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Protocol, judge and tuning
    pub decision: FileDecisionConfig,
    /// Model server connection
    pub oracle: FileOracleConfig,
    /// Agents that answer the question
    pub agents: FileAgentsConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.decision.validate();
        issues.extend(self.agents.validate());
        if self.oracle.request_timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(ConfigValidationError::ZeroTimeout(
                "oracle.request_timeout_secs",
            )));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{DecisionProtocol, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[decision]
protocol = "ranked_choice"
judge = "llama3:70b"
max_retries = 2
seed = 42

[oracle]
base_url = "http://localhost:11434"

[agents]
members = [
    { name = "Zeus", model = "llama3" },
    { name = "Athena", model = "qwen2.5" },
]

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let (decision, issues) = config.decision.to_decision_config();
        assert!(issues.is_empty());
        assert_eq!(decision.protocol, DecisionProtocol::RankedChoice);
        assert_eq!(decision.params.max_retries, 2);
        assert_eq!(decision.params.rng_seed, Some(42));
        assert_eq!(config.agents.members.len(), 2);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[decision]
protocol = "Fight to the Death"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.decision.judge(), None);
        // Defaults should apply
        assert_eq!(config.decision.nomination_temperature, 0.5);
        assert_eq!(config.oracle, FileOracleConfig::default());
        assert!(config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let toml_str = r#"
[decision]
protocol = "arbiter"

[oracle]
request_timeout_secs = 0

[agents]
members = [{ name = "", model = "llama3" }]
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
    }
}
