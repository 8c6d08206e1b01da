//! Ollama HTTP wire types
//!
//! `POST /api/chat` takes a [`ChatRequest`]; with `stream: true` the body is
//! NDJSON, one [`ChatChunk`] per line, the last one carrying `done: true`.
//! `GET /api/tags` returns [`TagsResponse`].

use super::error::{OllamaError, Result};
use conclave_application::ChatOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
    #[serde(skip_serializing_if = "SamplingOptions::is_empty")]
    pub options: SamplingOptions,
}

impl<'a> ChatRequest<'a> {
    /// Single-turn user prompt
    pub fn user(model: &'a str, prompt: &'a str, options: &ChatOptions, stream: bool) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream,
            options: SamplingOptions {
                temperature: options.temperature,
                seed: options.seed,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SamplingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SamplingOptions {
    fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.seed.is_none()
    }
}

/// One `/api/chat` reply object (a whole reply, or one NDJSON line)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub message: Option<ReplyMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatChunk {
    pub fn parse(line: &str) -> Result<Self> {
        let chunk: ChatChunk = serde_json::from_str(line)?;
        match chunk.error {
            Some(message) => Err(OllamaError::Server(message)),
            None => Ok(chunk),
        }
    }

    pub fn content(&self) -> &str {
        self.message
            .as_ref()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

/// Reassembles NDJSON lines from arbitrarily split byte chunks
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Append bytes and return every complete, non-blank line
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line).trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }

    /// Whatever is left once the body ends
    pub fn finish(self) -> Option<String> {
        let rest = String::from_utf8_lossy(&self.pending).trim().to_string();
        (!rest.is_empty()).then_some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let options = ChatOptions::default().with_temperature(0.5).with_seed(7);
        let request = ChatRequest::user("llama3", "hi", &options, true);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "llama3");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["stream"], true);
        assert_eq!(json["options"]["temperature"], 0.5);
        assert_eq!(json["options"]["seed"], 7);
    }

    #[test]
    fn test_default_options_are_omitted() {
        let request = ChatRequest::user("llama3", "hi", &ChatOptions::default(), false);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_chunk_parse() {
        let chunk = ChatChunk::parse(r#"{"message":{"role":"assistant","content":"Hel"},"done":false}"#)
            .unwrap();
        assert_eq!(chunk.content(), "Hel");
        assert!(!chunk.done);

        let last = ChatChunk::parse(r#"{"done":true,"total_duration":12}"#).unwrap();
        assert!(last.done);
        assert_eq!(last.content(), "");
    }

    #[test]
    fn test_chunk_error() {
        let err = ChatChunk::parse(r#"{"error":"model 'x' not found"}"#).unwrap_err();
        assert!(matches!(err, OllamaError::Server(m) if m.contains("not found")));
    }

    #[test]
    fn test_line_buffer_reassembles_split_lines() {
        let mut buffer = LineBuffer::default();
        assert!(buffer.push(b"{\"done\":").is_empty());
        assert_eq!(buffer.push(b"false}\n\n{\"do"), vec!["{\"done\":false}"]);
        assert_eq!(buffer.push(b"ne\":true}\n"), vec!["{\"done\":true}"]);
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_finish_returns_tail() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"{\"done\":true}");
        assert_eq!(buffer.finish().as_deref(), Some("{\"done\":true}"));
    }
}
