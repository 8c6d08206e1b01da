//! Port for structured deliberation logging.
//!
//! Defines the [`DeliberationLogger`] trait for recording decision events
//! (ballots, rounds, verdicts, results) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! deliberation transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured deliberation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter stamps the time.
#[derive(Debug, Clone)]
pub struct DeliberationEvent {
    /// Event type identifier (e.g., "ballot", "round", "verdict", "result").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DeliberationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging deliberation events to a structured log.
///
/// `log` is synchronous and non-fallible; adapters swallow write failures.
pub trait DeliberationLogger: Send + Sync {
    /// Record a deliberation event.
    fn log(&self, event: DeliberationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDeliberationLogger;

impl DeliberationLogger for NoDeliberationLogger {
    fn log(&self, _event: DeliberationEvent) {}
}
