//! Core domain concepts shared across all subdomains.
//!
//! - [`candidate::Candidate`] / [`candidate::CandidateSet`]: the competing responses
//! - [`error::DomainError`]: domain-level errors
//! - [`text`]: excerpt helpers used when building prompts

pub mod candidate;
pub mod error;
pub mod text;
