//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod collect_ballots;
pub mod generate_candidates;
pub mod judge_review;
pub mod run_decision;
pub(crate) mod shared;
