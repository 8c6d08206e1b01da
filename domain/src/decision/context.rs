//! Per-run decision state
//!
//! [`DecisionContext`] is owned by whoever runs a decision and passed down
//! by `&mut`. It carries the deliberation log, the round audit trail, the
//! mistrial counter and the random source.

use super::result::DecisionResult;
use crate::voting::tally::RoundRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Range mistrial seeds are drawn from
pub const MISTRIAL_SEED_RANGE: std::ops::RangeInclusive<u64> = 1..=1_000_000;

#[derive(Debug)]
pub struct DecisionContext {
    log: Vec<String>,
    rounds: Vec<RoundRecord>,
    retries: usize,
    rng: StdRng,
}

impl DecisionContext {
    /// A context seeded from `seed`, or from OS entropy when `None`
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            log: Vec::new(),
            rounds: Vec::new(),
            retries: 0,
            rng,
        }
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.log
    }

    /// Store round records and append their narratives to the log
    pub fn record_rounds(&mut self, rounds: &[RoundRecord]) {
        for record in rounds {
            self.log.push(record.narrative.clone());
        }
        self.rounds.extend_from_slice(rounds);
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    /// Mistrials declared so far
    pub fn retries(&self) -> usize {
        self.retries
    }

    /// Count a mistrial and draw the seed for the retrial
    pub fn declare_mistrial(&mut self) -> u64 {
        self.retries += 1;
        self.rng.gen_range(MISTRIAL_SEED_RANGE)
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn finish(
        self,
        final_text: impl Into<String>,
        source_label: impl Into<String>,
        survivors: BTreeSet<String>,
    ) -> DecisionResult {
        DecisionResult::new(final_text, source_label, self.log, survivors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voting::tally::Tally;

    #[test]
    fn test_mistrial_seeds_are_reproducible() {
        let mut a = DecisionContext::new(Some(7));
        let mut b = DecisionContext::new(Some(7));
        let seed = a.declare_mistrial();
        assert_eq!(seed, b.declare_mistrial());
        assert!(MISTRIAL_SEED_RANGE.contains(&seed));
        assert_eq!(a.retries(), 1);
    }

    #[test]
    fn test_record_rounds_logs_narratives() {
        let mut ctx = DecisionContext::new(Some(1));
        ctx.log("start");
        ctx.record_rounds(&[
            RoundRecord::new(1, Tally::default(), "Round 1: x"),
            RoundRecord::new(2, Tally::default(), "Round 2: y"),
        ]);
        assert_eq!(ctx.lines(), ["start", "Round 1: x", "Round 2: y"]);
        assert_eq!(ctx.rounds().len(), 2);

        let result = ctx.finish("text", "label", BTreeSet::new());
        assert_eq!(result.log.len(), 3);
        assert_eq!(result.source_label, "label");
    }
}
