//! Oracle configuration from TOML (`[oracle]` section)

use crate::ollama::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw oracle configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    /// Base URL of the Ollama server
    pub base_url: String,
    /// HTTP timeout for a whole request; omit for no limit
    pub request_timeout_secs: Option<u64>,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl FileOracleConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_config_deserialize() {
        let toml_str = r#"
[oracle]
base_url = "http://gpu-box:11434"
request_timeout_secs = 600
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.oracle.base_url, "http://gpu-box:11434");
        assert_eq!(config.oracle.request_timeout(), Some(Duration::from_secs(600)));
    }
}
