//! Logging infrastructure: structured deliberation transcripts.
//!
//! Provides [`JsonlDeliberationLogger`], a JSONL file writer that implements
//! the [`DeliberationLogger`](conclave_application::DeliberationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlDeliberationLogger;
