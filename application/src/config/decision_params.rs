//! Decision parameters: use case tuning.
//!
//! [`DecisionParams`] groups the static parameters that control how
//! [`RunDecisionUseCase`](crate::use_cases::run_decision::RunDecisionUseCase)
//! talks to the oracle. These are application-layer concerns, not domain
//! policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Decision tuning parameters.
///
/// | Call | Temperature |
/// |------|-------------|
/// | Ranked ballot | model default |
/// | Nomination list | 0.5 |
/// | Judge verdict | 0.1 |
/// | Mistrial ballots and verdict | 0.7 (with seed) |
/// | Summary | 0.2 |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionParams {
    /// Mistrials allowed before the judge rules alone.
    pub max_retries: usize,
    /// Timeout for each ballot or nomination call.
    pub voter_timeout: Option<Duration>,
    /// Upper bound on concurrent voter calls (defaults to the candidate count).
    pub max_parallel_voters: Option<usize>,
    /// Characters of each candidate shown to voters.
    pub excerpt_len: usize,
    pub ballot_temperature: Option<f32>,
    pub nomination_temperature: f32,
    pub verdict_temperature: f32,
    pub mistrial_temperature: f32,
    pub summary_temperature: f32,
    /// Seed for stalemate picks and mistrial seeds; entropy when `None`.
    pub rng_seed: Option<u64>,
    /// Custom clean-elimination lines with a `{victim}` placeholder.
    pub narrative_lines: Vec<String>,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            max_retries: 1,
            voter_timeout: Some(Duration::from_secs(120)),
            max_parallel_voters: None,
            excerpt_len: 800,
            ballot_temperature: None,
            nomination_temperature: 0.5,
            verdict_temperature: 0.1,
            mistrial_temperature: 0.7,
            summary_temperature: 0.2,
            rng_seed: None,
            narrative_lines: Vec::new(),
        }
    }
}

impl DecisionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_voter_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.voter_timeout = timeout;
        self
    }

    pub fn with_max_parallel_voters(mut self, max: Option<usize>) -> Self {
        self.max_parallel_voters = max;
        self
    }

    pub fn with_excerpt_len(mut self, len: usize) -> Self {
        self.excerpt_len = len;
        self
    }

    pub fn with_rng_seed(mut self, seed: Option<u64>) -> Self {
        self.rng_seed = seed;
        self
    }

    pub fn with_narrative_lines(mut self, lines: Vec<String>) -> Self {
        self.narrative_lines = lines;
        self
    }

    /// Concurrent voter calls for `voters` voters
    pub fn parallelism(&self, voters: usize) -> usize {
        let cap = self.max_parallel_voters.unwrap_or(voters);
        cap.min(voters).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DecisionParams::default();
        assert_eq!(params.max_retries, 1);
        assert_eq!(params.excerpt_len, 800);
        assert_eq!(params.nomination_temperature, 0.5);
        assert_eq!(params.verdict_temperature, 0.1);
        assert_eq!(params.mistrial_temperature, 0.7);
        assert_eq!(params.summary_temperature, 0.2);
        assert!(params.rng_seed.is_none());
    }

    #[test]
    fn test_builder() {
        let params = DecisionParams::default()
            .with_max_retries(3)
            .with_rng_seed(Some(9))
            .with_voter_timeout(None);
        assert_eq!(params.max_retries, 3);
        assert_eq!(params.rng_seed, Some(9));
        assert!(params.voter_timeout.is_none());
    }

    #[test]
    fn test_parallelism() {
        let params = DecisionParams::default();
        assert_eq!(params.parallelism(5), 5);
        assert_eq!(params.parallelism(0), 1);
        let capped = params.with_max_parallel_voters(Some(2));
        assert_eq!(capped.parallelism(5), 2);
        assert_eq!(capped.parallelism(1), 1);
    }
}
