//! Instant-runoff voting
//!
//! Each round credits every ballot's first still-active preference. A
//! candidate holding a strict majority of the votes cast wins; otherwise the
//! weakest candidate is eliminated and the round repeats.
//!
//! # Termination
//!
//! ```text
//! total == 0           → NoClearWinner
//! 2·lead > total       → Elected(leader)
//! one candidate left   → Elected(leader)
//! max == min           → Elected(leader)   (dead tie)
//! otherwise            → eliminate last-ranked, next round
//! ```
//!
//! The zero-total check runs before the dead-tie check, so a round where
//! nobody received a vote never crowns an arbitrary leader.

use super::tally::{RoundRecord, Tally};
use crate::ballot::Ballot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Winner of an instant-runoff run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrvWinner {
    Elected(String),
    /// No ballot named an active candidate
    NoClearWinner,
}

impl IrvWinner {
    pub fn name(&self) -> Option<&str> {
        match self {
            IrvWinner::Elected(name) => Some(name),
            IrvWinner::NoClearWinner => None,
        }
    }
}

impl std::fmt::Display for IrvWinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrvWinner::Elected(name) => write!(f, "{}", name),
            IrvWinner::NoClearWinner => write!(f, "No Clear Winner"),
        }
    }
}

/// Result of [`run_irv`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrvOutcome {
    pub winner: IrvWinner,
    /// One record per round, in order
    pub rounds: Vec<RoundRecord>,
}

impl IrvOutcome {
    /// Narrative lines of every round, for the deliberation log
    pub fn narrative(&self) -> impl Iterator<Item = &str> {
        self.rounds.iter().map(|r| r.narrative.as_str())
    }
}

/// Run instant-runoff voting over `ballots`.
///
/// Ballot entries that are not in `candidates` are ignored. The computation
/// is pure: identical inputs always yield identical outcomes.
///
/// # Example
///
/// ```
/// use conclave_domain::{run_irv, IrvWinner};
/// use std::collections::BTreeSet;
///
/// let b = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
/// let ballots = vec![b(&["A", "B"]), b(&["B", "A"]), b(&["A", "C"])];
/// let candidates: BTreeSet<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
///
/// let outcome = run_irv(&ballots, &candidates);
/// assert_eq!(outcome.winner, IrvWinner::Elected("A".to_string()));
/// assert_eq!(outcome.rounds.len(), 1);
/// ```
pub fn run_irv(ballots: &[Ballot], candidates: &BTreeSet<String>) -> IrvOutcome {
    let mut active = candidates.clone();
    let mut rounds = Vec::new();

    loop {
        let round = rounds.len() + 1;
        let tally = Tally::first_active_preferences(&active, ballots);
        let total = tally.total();
        let ranked: Vec<(String, usize)> = tally
            .ranked()
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();

        let Some((leader, lead)) = ranked.first().cloned() else {
            rounds.push(RoundRecord::new(round, tally, "No candidates remain."));
            return IrvOutcome {
                winner: IrvWinner::NoClearWinner,
                rounds,
            };
        };

        if total == 0 {
            rounds.push(RoundRecord::new(
                round,
                tally,
                format!("Round {}: no valid votes were cast. No clear winner.", round),
            ));
            return IrvOutcome {
                winner: IrvWinner::NoClearWinner,
                rounds,
            };
        }

        if lead * 2 > total || active.len() <= 1 {
            let narrative = format!(
                "Round {}: {} wins with {} of {} votes.",
                round, leader, lead, total
            );
            rounds.push(RoundRecord::new(round, tally, narrative));
            return IrvOutcome {
                winner: IrvWinner::Elected(leader),
                rounds,
            };
        }

        if tally.max() == tally.min() {
            let narrative = format!(
                "Round {}: dead tie at {} votes each. Tie-breaker awards the round to {}.",
                round, lead, leader
            );
            rounds.push(RoundRecord::new(round, tally, narrative));
            return IrvOutcome {
                winner: IrvWinner::Elected(leader),
                rounds,
            };
        }

        // max > min, so the last-ranked candidate is never the leader
        let (loser, loser_votes) = ranked[ranked.len() - 1].clone();
        active.remove(&loser);
        rounds.push(RoundRecord::new(
            round,
            tally,
            format!(
                "Round {}: eliminated {} with {} votes.",
                round, loser, loser_votes
            ),
        ));
    }
}
