//! Agent roster from TOML (`[agents]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [agents]
//! response_timeout_secs = 300
//! members = [
//!     { name = "Zeus", model = "llama3" },
//!     { name = "Athena", model = "qwen2.5:14b" },
//! ]
//! ```

use super::validation::{ConfigIssue, ConfigValidationError};
use conclave_application::AgentSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAgent {
    pub name: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentsConfig {
    pub members: Vec<FileAgent>,
    /// Timeout for each agent's first answer
    pub response_timeout_secs: Option<u64>,
}

impl Default for FileAgentsConfig {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            response_timeout_secs: Some(300),
        }
    }
}

impl FileAgentsConfig {
    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout_secs.map(Duration::from_secs)
    }

    /// Usable agents plus issues for the skipped ones.
    ///
    /// Blank names or models are skipped; for duplicate names (ignoring
    /// case) the first entry wins.
    pub fn parse_members(&self) -> (Vec<AgentSpec>, Vec<ConfigIssue>) {
        let mut specs = Vec::new();
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for member in &self.members {
            let name = member.name.trim();
            let model = member.model.trim();
            if name.is_empty() {
                issues.push(ConfigIssue::error(ConfigValidationError::EmptyAgentName));
                continue;
            }
            if model.is_empty() {
                issues.push(ConfigIssue::error(ConfigValidationError::EmptyModelName(
                    name.to_string(),
                )));
                continue;
            }
            if !seen.insert(name.to_lowercase()) {
                issues.push(ConfigIssue::warning(ConfigValidationError::DuplicateAgent(
                    name.to_string(),
                )));
                continue;
            }
            specs.push(AgentSpec::new(name, model));
        }
        (specs, issues)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_members().1;
        if self.response_timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(ConfigValidationError::ZeroTimeout(
                "agents.response_timeout_secs",
            )));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(name: &str, model: &str) -> FileAgent {
        FileAgent {
            name: name.to_string(),
            model: model.to_string(),
        }
    }

    #[test]
    fn test_parse_members_skips_bad_entries() {
        let config = FileAgentsConfig {
            members: vec![
                agent("Zeus", "llama3"),
                agent(" ", "llama3"),
                agent("Hera", ""),
                agent("zeus", "qwen"),
                agent("Apollo", "mistral"),
            ],
            ..Default::default()
        };
        let (specs, issues) = config.parse_members();

        assert_eq!(
            specs,
            vec![AgentSpec::new("Zeus", "llama3"), AgentSpec::new("Apollo", "mistral")]
        );
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].error, ConfigValidationError::EmptyAgentName);
        assert_eq!(
            issues[1].error,
            ConfigValidationError::EmptyModelName("Hera".to_string())
        );
        assert!(!issues[2].is_error());
    }

    #[test]
    fn test_agents_deserialize() {
        let toml_str = r#"
[agents]
members = [{ name = "Zeus", model = "llama3" }]
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agents.members.len(), 1);
        assert_eq!(config.agents.response_timeout(), Some(Duration::from_secs(300)));
    }
}
