//! Best-effort extraction of a JSON name list from model output.

use crate::core::text::name_key;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Maximum number of ranked entries kept on a ballot
pub const BALLOT_DEPTH: usize = 3;

/// First bracketed list in the text, possibly spanning lines
static LIST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").expect("list pattern is valid"));

/// How many entries an extracted list may keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDepth {
    /// Ranked ballot, truncated to [`BALLOT_DEPTH`]
    Ranking,
    /// Nomination list, every matched entry kept
    Unbounded,
}

impl ListDepth {
    fn limit(self) -> usize {
        match self {
            ListDepth::Ranking => BALLOT_DEPTH,
            ListDepth::Unbounded => usize::MAX,
        }
    }
}

/// Outcome of pulling a name list out of free text
///
/// A failed extraction is a normal outcome, not an error: the voter simply
/// contributes nothing to the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A list was found and parsed. Entries are canonical names; the list
    /// may be empty when nothing matched the roster.
    Parsed(Vec<String>),
    /// No parseable list was found
    Failed,
}

/// Extract an ordered list of candidate names from a model's answer.
///
/// Finds the first `[...]` in `raw`, parses it as JSON, retrying with single
/// quotes turned into double quotes. String entries are matched against
/// `canonical_names` case-insensitively after trimming; unmatched entries
/// and repeats are dropped. The result is truncated according to `depth`.
///
/// # Examples
///
/// ```
/// use conclave_domain::{extract_name_list, Extraction, ListDepth};
///
/// let names = vec!["Athena".to_string(), "Odin".to_string()];
/// let out = extract_name_list("Sure! ['odin', 'ATHENA']", &names, ListDepth::Ranking);
/// assert_eq!(out, Extraction::Parsed(vec!["Odin".to_string(), "Athena".to_string()]));
///
/// assert_eq!(extract_name_list("no idea", &names, ListDepth::Ranking), Extraction::Failed);
/// ```
pub fn extract_name_list(raw: &str, canonical_names: &[String], depth: ListDepth) -> Extraction {
    let Some(entries) = parse_first_list(raw) else {
        return Extraction::Failed;
    };

    let official: HashMap<String, &String> =
        canonical_names.iter().map(|n| (name_key(n), n)).collect();

    let mut seen = HashSet::new();
    let names = entries
        .iter()
        .filter_map(|entry| entry.as_str())
        .filter_map(|entry| official.get(&name_key(entry)).copied())
        .filter(|name| seen.insert(name.to_string()))
        .take(depth.limit())
        .cloned()
        .collect();

    Extraction::Parsed(names)
}

/// Extract a nomination list, removing the nominator's own name.
pub fn extract_nominations(raw: &str, canonical_names: &[String], nominator: &str) -> Extraction {
    match extract_name_list(raw, canonical_names, ListDepth::Unbounded) {
        Extraction::Parsed(names) => {
            let own = name_key(nominator);
            Extraction::Parsed(
                names
                    .into_iter()
                    .filter(|name| name_key(name) != own)
                    .collect(),
            )
        }
        Extraction::Failed => Extraction::Failed,
    }
}

/// Render a name list the way a well-behaved voter would answer.
pub fn render_name_list(names: &[String]) -> String {
    serde_json::to_string(names).unwrap_or_else(|_| "[]".to_string())
}

fn parse_first_list(raw: &str) -> Option<Vec<serde_json::Value>> {
    let literal = LIST_PATTERN.find(raw)?.as_str();

    let strict = serde_json::from_str::<serde_json::Value>(literal);
    let value = match strict {
        Ok(value) => value,
        Err(_) => serde_json::from_str(&literal.replace('\'', "\"")).ok()?,
    };

    match value {
        serde_json::Value::Array(entries) => Some(entries),
        _ => None,
    }
}
