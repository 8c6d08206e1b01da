//! Configuration validation results

use thiserror::Error;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("decision.protocol: unknown value '{0}', falling back to 'none'")]
    UnknownProtocol(String),

    #[error("decision.protocol: {0} requires a judge, but decision.judge is not set")]
    MissingJudge(String),

    #[error("{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("agent name cannot be empty")]
    EmptyAgentName,

    #[error("agent '{0}' has an empty model name")]
    EmptyModelName(String),

    #[error("duplicate agent name '{0}', only the first is used")]
    DuplicateAgent(String),
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub error: ConfigValidationError,
}

impl ConfigIssue {
    pub fn error(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    pub fn warning(error: ConfigValidationError) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let issue = ConfigIssue::error(ConfigValidationError::ZeroTimeout(
            "decision.voter_timeout_secs",
        ));
        assert!(issue.is_error());
        assert_eq!(
            issue.to_string(),
            "error: decision.voter_timeout_secs cannot be 0"
        );
    }
}
