//! Candidate value objects
//!
//! A [`Candidate`] is one agent's response competing in a decision round.
//! A [`CandidateSet`] is the ordered roster for one round, with names that
//! are unique under case-insensitive comparison.

use super::text::name_key;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One agent's response competing in a decision round (Value Object)
///
/// # Example
///
/// ```
/// use conclave_domain::Candidate;
///
/// let c = Candidate::new("Athena", "llama3:8b", "Use a BTreeMap.");
/// assert_eq!(c.name, "Athena");
/// assert_eq!(c.model_tag, "llama3:8b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Display name, unique within a round
    pub name: String,
    /// Model that produced the response (also the model used when this
    /// agent votes)
    #[serde(alias = "model")]
    pub model_tag: String,
    /// The response text
    pub content: String,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        model_tag: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model_tag: model_tag.into(),
            content: content.into(),
        }
    }
}

/// Ordered roster of candidates with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Build a set, silently dropping duplicate or blank names.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self::dedupe(candidates).0
    }

    /// Build a set and return the candidates that were rejected.
    ///
    /// The first occurrence of a name wins. Names are compared
    /// case-insensitively after trimming, matching the rule ballots use to
    /// map free-text votes back onto the roster. Blank names are rejected.
    pub fn dedupe(candidates: Vec<Candidate>) -> (Self, Vec<Candidate>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(candidates.len());
        let mut rejected = Vec::new();

        for candidate in candidates {
            let key = name_key(&candidate.name);
            if key.is_empty() || !seen.insert(key) {
                rejected.push(candidate);
            } else {
                kept.push(candidate);
            }
        }

        (Self { candidates: kept }, rejected)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Candidate names in roster order
    pub fn names(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    /// Candidate names as an ordered set
    pub fn name_set(&self) -> BTreeSet<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a candidate by its exact canonical name
    pub fn get(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.name == name)
    }

    /// The only candidate, if the roster has exactly one
    pub fn single(&self) -> Option<&Candidate> {
        match self.candidates.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Restrict the roster to the given names, preserving roster order
    pub fn retain_names(&self, names: &BTreeSet<String>) -> CandidateSet {
        Self {
            candidates: self
                .candidates
                .iter()
                .filter(|c| names.contains(&c.name))
                .cloned()
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for CandidateSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let candidates = Vec::<Candidate>::deserialize(deserializer)?;
        Ok(CandidateSet::new(candidates))
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        CandidateSet::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(name: &str) -> Candidate {
        Candidate::new(name, "model", format!("{} says hi", name))
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let (set, rejected) = CandidateSet::dedupe(vec![c("Athena"), c("Odin"), c(" athena ")]);
        assert_eq!(set.names(), vec!["Athena", "Odin"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].name, " athena ");
    }

    #[test]
    fn test_blank_names_rejected() {
        let (set, rejected) = CandidateSet::dedupe(vec![c("  "), c("Odin")]);
        assert_eq!(set.len(), 1);
        assert_eq!(rejected.len(), 1);
    }

    #[test]
    fn test_single() {
        assert!(CandidateSet::new(vec![c("A"), c("B")]).single().is_none());
        assert_eq!(CandidateSet::new(vec![c("A")]).single().unwrap().name, "A");
        assert!(CandidateSet::default().single().is_none());
    }

    #[test]
    fn test_retain_names_preserves_order() {
        let set = CandidateSet::new(vec![c("C"), c("A"), c("B")]);
        let keep: BTreeSet<String> = ["A".to_string(), "C".to_string()].into();
        assert_eq!(set.retain_names(&keep).names(), vec!["C", "A"]);
    }

    #[test]
    fn test_deserialize_accepts_model_alias_and_dedupes() {
        let json = r#"[
            {"name": "A", "model": "llama3", "content": "x"},
            {"name": "a", "model_tag": "qwen", "content": "y"}
        ]"#;
        let set: CandidateSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A").unwrap().model_tag, "llama3");
    }
}
