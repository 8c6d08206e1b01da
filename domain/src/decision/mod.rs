//! Decision protocols, run state and results
//!
//! - [`protocol::DecisionProtocol`]: which protocol decides
//! - [`context::DecisionContext`]: log, rounds, retry counter and RNG of one run
//! - [`result::DecisionResult`]: what a run returns

pub mod context;
pub mod protocol;
pub mod result;
