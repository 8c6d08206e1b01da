//! Ollama oracle implementation

use super::error::{OllamaError, Result};
use super::protocol::{ChatChunk, ChatRequest, LineBuffer, TagsResponse};
use async_trait::async_trait;
use conclave_application::{ChatOptions, Oracle, OracleError, StreamHandle};
use conclave_domain::StreamEvent;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default address of a local Ollama server
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

const STREAM_BUFFER: usize = 64;

/// Oracle backed by the Ollama HTTP API
#[derive(Debug, Clone)]
pub struct OllamaOracle {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaOracle {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Create an oracle whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "conclave/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("OllamaOracle initialized at {}", base_url);
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_chat(
        &self,
        model: &str,
        prompt: &str,
        options: &ChatOptions,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let request = ChatRequest::user(model, prompt, options, stream);
        debug!(model = %model, stream, "POST /api/chat");
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await?;
        check_status(model, response).await
    }

    async fn chat_once(&self, model: &str, prompt: &str, options: &ChatOptions) -> Result<String> {
        let response = self.send_chat(model, prompt, options, false).await?;
        let body = response.text().await?;
        Ok(ChatChunk::parse(&body)?.content().to_string())
    }

    /// Names of the models installed on the server
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self.client.get(self.url("/api/tags")).send().await?;
        let response = check_status("", response).await?;
        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

async fn check_status(model: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::NOT_FOUND && !model.is_empty() {
        return Err(OllamaError::ModelNotFound(model.to_string()));
    }
    Err(OllamaError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Forward NDJSON chunks of a streamed reply as events until `done`
async fn pump_stream(response: reqwest::Response, tx: mpsc::Sender<StreamEvent>) {
    let mut body = response.bytes_stream();
    let mut buffer = LineBuffer::default();
    let mut full_text = String::new();

    while let Some(bytes) = body.next().await {
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
        };
        for line in buffer.push(&bytes) {
            match forward_line(&line, &mut full_text, &tx).await {
                Ok(true) => return,
                Ok(false) => {}
                Err(e) => {
                    let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                    return;
                }
            }
        }
    }

    if let Some(line) = buffer.finish() {
        match forward_line(&line, &mut full_text, &tx).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                return;
            }
        }
    }

    warn!("Ollama stream closed without a done marker");
    let _ = tx
        .send(StreamEvent::Error(OllamaError::Truncated.to_string()))
        .await;
}

/// Returns `true` once the final chunk was forwarded
async fn forward_line(
    line: &str,
    full_text: &mut String,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<bool> {
    let chunk = ChatChunk::parse(line)?;
    let content = chunk.content();
    if !content.is_empty() {
        full_text.push_str(content);
        let _ = tx.send(StreamEvent::Delta(content.to_string())).await;
    }
    if chunk.done {
        let _ = tx
            .send(StreamEvent::Completed(std::mem::take(full_text)))
            .await;
    }
    Ok(chunk.done)
}

#[async_trait]
impl Oracle for OllamaOracle {
    async fn chat(
        &self,
        model: &str,
        prompt: &str,
        options: &ChatOptions,
    ) -> std::result::Result<String, OracleError> {
        self.chat_once(model, prompt, options).await.map_err(|e| {
            warn!(model = %model, "Ollama chat failed: {}", e);
            OracleError::from(e)
        })
    }

    async fn chat_streaming(
        &self,
        model: &str,
        prompt: &str,
        options: &ChatOptions,
    ) -> std::result::Result<StreamHandle, OracleError> {
        let response = self.send_chat(model, prompt, options, true).await?;
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        tokio::spawn(pump_stream(response, tx));
        Ok(StreamHandle::new(rx))
    }

    async fn available_models(&self) -> std::result::Result<Vec<String>, OracleError> {
        Ok(self.list_models().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let oracle = OllamaOracle::new("http://localhost:11434/").unwrap();
        assert_eq!(oracle.base_url(), "http://localhost:11434");
        assert_eq!(oracle.url("/api/tags"), "http://localhost:11434/api/tags");
    }

    #[tokio::test]
    async fn test_forward_line_emits_delta_then_completed() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut full_text = String::new();

        let done = forward_line(r#"{"message":{"content":"Hel"},"done":false}"#, &mut full_text, &tx)
            .await
            .unwrap();
        assert!(!done);
        let done = forward_line(r#"{"message":{"content":"lo"},"done":true}"#, &mut full_text, &tx)
            .await
            .unwrap();
        assert!(done);
        drop(tx);

        assert_eq!(rx.recv().await, Some(StreamEvent::Delta("Hel".to_string())));
        assert_eq!(rx.recv().await, Some(StreamEvent::Delta("lo".to_string())));
        assert_eq!(
            rx.recv().await,
            Some(StreamEvent::Completed("Hello".to_string()))
        );
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_oracle_error() {
        // Port 9 (discard) is closed on test machines
        let oracle = OllamaOracle::with_timeout("http://127.0.0.1:9", Some(Duration::from_secs(2)))
            .unwrap();
        let err = oracle
            .chat("llama3", "hi", &ChatOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::Connection(_) | OracleError::Timeout | OracleError::RequestFailed(_)
        ));
    }
}
