//! Prompt domain
//!
//! Templates for generating prompts at each stage of a decision.

mod template;

pub use template::DecisionPrompt;
