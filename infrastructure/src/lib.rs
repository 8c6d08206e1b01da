//! Infrastructure layer for conclave
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod ollama;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileAgent, FileAgentsConfig, FileConfig,
    FileDecisionConfig, FileOracleConfig, FileOutputConfig, FileOutputFormat, Severity,
};
pub use logging::JsonlDeliberationLogger;
pub use ollama::{DEFAULT_BASE_URL, OllamaError, OllamaOracle};
