//! Error types for the Ollama adapter

use conclave_application::OracleError;
use thiserror::Error;

/// Result type alias for Ollama operations
pub type Result<T> = std::result::Result<T, OllamaError>;

/// Errors that can occur when talking to an Ollama server
#[derive(Error, Debug)]
pub enum OllamaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Server reported an error: {0}")]
    Server(String),

    #[error("Stream ended before the reply was complete")]
    Truncated,
}

impl From<OllamaError> for OracleError {
    fn from(error: OllamaError) -> Self {
        match error {
            OllamaError::Http(e) if e.is_timeout() => OracleError::Timeout,
            OllamaError::Http(e) if e.is_connect() => OracleError::Connection(e.to_string()),
            OllamaError::Http(e) => OracleError::RequestFailed(e.to_string()),
            OllamaError::Status { status, message } => {
                OracleError::RequestFailed(format!("{}: {}", status, message))
            }
            OllamaError::ModelNotFound(model) => OracleError::ModelNotAvailable(model),
            OllamaError::Serialization(e) => OracleError::InvalidResponse(e.to_string()),
            e @ OllamaError::Truncated => OracleError::InvalidResponse(e.to_string()),
            OllamaError::Server(message) => OracleError::RequestFailed(message),
        }
    }
}
