//! Streaming events for oracle communication.
//!
//! [`StreamEvent`] represents individual events in a streamed model reply,
//! enabling real-time display of output as it's generated.

/// An event in a streaming oracle response.
///
/// Bridges infrastructure-level streaming (NDJSON chunks from the model
/// server) to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text chunk from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            StreamEvent::Error(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_text_returns_content() {
        let event = StreamEvent::Delta("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
    }

    #[test]
    fn completed_text_returns_content() {
        let event = StreamEvent::Completed("full response".to_string());
        assert_eq!(event.text(), Some("full response"));
    }

    #[test]
    fn error_text_returns_none() {
        let event = StreamEvent::Error("oops".to_string());
        assert_eq!(event.text(), None);
    }
}
