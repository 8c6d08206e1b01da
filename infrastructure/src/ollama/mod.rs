//! Ollama adapter
//!
//! Implements the [`Oracle`](conclave_application::Oracle) port against a
//! local Ollama server.

pub mod error;
pub mod oracle;
pub mod protocol;

pub use error::OllamaError;
pub use oracle::{DEFAULT_BASE_URL, OllamaOracle};
