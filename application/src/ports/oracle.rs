//! Oracle port
//!
//! Defines the interface for sending a prompt to a named model.

use async_trait::async_trait;
use conclave_domain::StreamEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during oracle calls
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Sampling options for one call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub seed: Option<u64>,
}

impl ChatOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// `None` leaves the model's default temperature
    pub fn with_temperature_opt(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Gateway to the models that answer, vote and judge
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Send a single-turn prompt and get the full reply
    async fn chat(
        &self,
        model: &str,
        prompt: &str,
        options: &ChatOptions,
    ) -> Result<String, OracleError>;

    /// Send a prompt and get a streaming reply.
    ///
    /// Default implementation calls `chat()` and wraps the result in a single
    /// `Completed` event.
    async fn chat_streaming(
        &self,
        model: &str,
        prompt: &str,
        options: &ChatOptions,
    ) -> Result<StreamHandle, OracleError> {
        let result = self.chat(model, prompt, options).await?;
        let (tx, rx) = mpsc::channel(1);
        // Send Completed event; a dropped receiver is fine
        let _ = tx.send(StreamEvent::Completed(result)).await;
        Ok(StreamHandle::new(rx))
    }

    /// Models the oracle can serve
    async fn available_models(&self) -> Result<Vec<String>, OracleError> {
        Ok(Vec::new())
    }
}

/// Handle for receiving streaming events from an oracle call.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    ///
    /// The stream is fully drained before this returns.
    pub async fn collect_text(self) -> Result<String, OracleError> {
        self.collect_text_with(|_| {}).await
    }

    /// Like [`collect_text`](Self::collect_text), calling `on_chunk` for
    /// every delta as it arrives.
    pub async fn collect_text_with(
        mut self,
        mut on_chunk: impl FnMut(&str) + Send,
    ) -> Result<String, OracleError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_chunk(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        on_chunk(&text);
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(OracleError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed; return what we have
        Ok(full_text)
    }
}
