//! Application layer for conclave
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DecisionConfig, DecisionParams};
pub use ports::{
    deliberation_logger::{DeliberationEvent, DeliberationLogger, NoDeliberationLogger},
    oracle::{ChatOptions, Oracle, OracleError, StreamHandle},
    progress::{DecisionProgress, DecisionStage, NoProgress},
};
pub use use_cases::generate_candidates::{
    AgentSpec, GenerateCandidatesError, GenerateCandidatesInput, GenerateCandidatesUseCase,
};
pub use use_cases::run_decision::{RunDecisionError, RunDecisionInput, RunDecisionUseCase};
