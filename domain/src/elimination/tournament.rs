//! Elimination tournament state machine
//!
//! ```text
//! ┌──────────── while |active| > 1 ─────────────┐
//! │ tally first active nominee of active voters │
//! │   all zero      → remove one at random      │
//! │   unique max    → remove the leader         │
//! │   k tied at max → remove all k              │
//! └─────────────────────────────────────────────┘
//!   |active| == 1 → SoleSurvivor
//!   |active| == 0 → TotalWipeout (finalists = last non-empty active set)
//! ```

use super::skin::Narrator;
use crate::ballot::NominationList;
use crate::voting::tally::{RoundRecord, Tally};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How a tournament ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    SoleSurvivor(String),
    /// Nobody is left standing
    TotalWipeout,
}

/// Result of [`run_elimination`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationOutcome {
    pub terminal: Terminal,
    pub rounds: Vec<RoundRecord>,
    /// Removed candidates in the order they left
    pub eliminated: Vec<String>,
    /// The survivor, or on a wipeout the last non-empty active set
    pub finalists: BTreeSet<String>,
}

impl EliminationOutcome {
    pub fn survivor(&self) -> Option<&str> {
        match &self.terminal {
            Terminal::SoleSurvivor(name) => Some(name),
            Terminal::TotalWipeout => None,
        }
    }
}

/// Run an elimination tournament.
///
/// `nominations` maps each voter to its "remove first" list. Voters that
/// are no longer active do not vote. `rng` is consulted only for stalemates
/// and for picking narrative lines.
pub fn run_elimination<R: Rng + ?Sized>(
    nominations: &BTreeMap<String, NominationList>,
    candidates: &BTreeSet<String>,
    narrator: &Narrator,
    rng: &mut R,
) -> EliminationOutcome {
    let mut active = candidates.clone();
    let mut finalists = candidates.clone();
    let mut rounds = Vec::new();
    let mut eliminated = Vec::new();

    while active.len() > 1 {
        let round = rounds.len() + 1;
        finalists = active.clone();

        let ballots = nominations
            .iter()
            .filter(|(voter, _)| active.contains(*voter))
            .map(|(_, list)| list);
        let tally = Tally::first_active_preferences(&active, ballots);

        let (removed, text) = if tally.total() == 0 {
            let pick = rng.gen_range(0..active.len());
            let victim = active.iter().nth(pick).cloned().unwrap_or_default();
            let text = narrator.stalemate(&victim);
            (vec![victim], text)
        } else {
            let leaders: Vec<String> = tally.leaders().into_iter().map(String::from).collect();
            let count = tally.max();
            if let [victim] = leaders.as_slice() {
                let text = narrator.clean_elimination(victim, count, rng);
                (leaders, text)
            } else {
                let text = narrator.collateral(&leaders, count);
                (leaders, text)
            }
        };

        for name in &removed {
            active.remove(name);
        }
        eliminated.extend(removed);
        rounds.push(RoundRecord::new(
            round,
            tally,
            format!("Round {}: {}", round, text),
        ));
    }

    let terminal = match active.iter().next() {
        Some(survivor) => {
            finalists = active.clone();
            Terminal::SoleSurvivor(survivor.clone())
        }
        None => Terminal::TotalWipeout,
    };

    EliminationOutcome {
        terminal,
        rounds,
        eliminated,
        finalists,
    }
}
