//! Round tallies and the round audit trail

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Votes per active candidate in one round
///
/// Keys are exactly the candidates active at the start of the round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    counts: BTreeMap<String, usize>,
}

impl Tally {
    /// A tally with every active candidate at zero
    pub fn zeroed(active: &BTreeSet<String>) -> Self {
        Self {
            counts: active.iter().map(|name| (name.clone(), 0)).collect(),
        }
    }

    /// Credit each list's first entry that is still active.
    ///
    /// Lists with no active entry are exhausted and contribute nothing.
    pub fn first_active_preferences<'a, I>(active: &BTreeSet<String>, lists: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec<String>>,
    {
        let mut tally = Self::zeroed(active);
        for list in lists {
            if let Some(choice) = list.iter().find(|name| active.contains(*name)) {
                tally.credit(choice);
            }
        }
        tally
    }

    fn credit(&mut self, name: &str) {
        if let Some(count) = self.counts.get_mut(name) {
            *count += 1;
        }
    }

    pub fn get(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn max(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn min(&self) -> usize {
        self.counts.values().copied().min().unwrap_or(0)
    }

    /// Candidate names in this tally
    pub fn names(&self) -> BTreeSet<String> {
        self.counts.keys().cloned().collect()
    }

    /// Candidates ordered by votes descending, then by name ascending
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Every candidate holding the maximum count
    pub fn leaders(&self) -> Vec<&str> {
        let max = self.max();
        self.ranked()
            .into_iter()
            .filter(|(_, count)| *count == max)
            .map(|(name, _)| name)
            .collect()
    }

}

impl FromIterator<(String, usize)> for Tally {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// One round of a voting or elimination run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Round number (1-indexed)
    pub round: usize,
    /// Counts for the candidates active at the start of the round
    pub tally: Tally,
    /// What happened, for the deliberation log
    pub narrative: String,
}

impl RoundRecord {
    pub fn new(round: usize, tally: Tally, narrative: impl Into<String>) -> Self {
        Self {
            round,
            tally,
            narrative: narrative.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn list(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_active_preference_skips_inactive() {
        let lists = vec![list(&["X", "B"]), list(&["A"]), list(&["X"]), list(&[])];
        let tally = Tally::first_active_preferences(&active(&["A", "B"]), &lists);
        assert_eq!(tally.get("A"), 1);
        assert_eq!(tally.get("B"), 1);
        assert_eq!(tally.total(), 2);
        assert_eq!(tally.names(), active(&["A", "B"]));
    }

    #[test]
    fn test_ranked_breaks_ties_by_name() {
        let tally: Tally = [
            ("C".to_string(), 1),
            ("A".to_string(), 1),
            ("B".to_string(), 3),
        ]
        .into_iter()
        .collect();
        assert_eq!(tally.ranked(), vec![("B", 3), ("A", 1), ("C", 1)]);
        assert_eq!(tally.leaders(), vec!["B"]);
    }

    #[test]
    fn test_empty_tally() {
        let tally = Tally::zeroed(&BTreeSet::new());
        assert!(tally.is_empty());
        assert_eq!(tally.max(), 0);
        assert_eq!(tally.min(), 0);
    }
}
