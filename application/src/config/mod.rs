//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`DecisionParams`]: temperatures, retries, timeouts and excerpt length
//! - [`DecisionConfig`]: protocol + judge + params, builds use case inputs

pub mod decision_config;
pub mod decision_params;

pub use decision_config::DecisionConfig;
pub use decision_params::DecisionParams;
