//! Decision result

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Source labels shared by every protocol
pub mod labels {
    pub const AGGREGATION: &str = "Standard Aggregation";
    pub const AGGREGATION_NO_JUDGE: &str = "Standard Aggregation (No Judge Configured)";
    pub const NO_CLEAR_WINNER: &str = "No Clear Winner";
    pub const JUDGE_OVERRIDE: &str = "Verdict: Judge Override";
    pub const ERROR: &str = "Error";

    /// Final text of a failed judge call
    pub const JUDGMENT_FAILED: &str = "Judgment failed.";

    pub fn judge_verdict(judge: &str) -> String {
        format!("Judge Verdict ({})", judge)
    }

    pub fn ranked_choice_winner(name: &str) -> String {
        format!("Ranked Choice Winner: {}", name)
    }

    pub fn upheld(winner: &str) -> String {
        format!("Verdict: {} (Upheld)", winner)
    }

    /// The jury's pick stands but the judge could not polish it
    pub fn upheld_unrefined(winner: &str) -> String {
        format!("Verdict: {} (Upheld, refinement failed)", winner)
    }

    pub fn winner(name: &str) -> String {
        format!("Winner: {}", name)
    }

    /// Winner name given to a judge that rebuilt an answer after a wipeout
    pub fn post_mortem(judge: &str) -> String {
        format!("Judge {} (Post-Mortem)", judge)
    }
}

/// Outcome of one decision run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResult {
    /// The text to present as the answer
    pub final_text: String,
    /// Which protocol outcome produced `final_text`
    pub source_label: String,
    /// Ordered, human-readable deliberation log
    pub log: Vec<String>,
    /// Candidate names still standing
    pub survivors: BTreeSet<String>,
}

impl DecisionResult {
    pub fn new(
        final_text: impl Into<String>,
        source_label: impl Into<String>,
        log: Vec<String>,
        survivors: BTreeSet<String>,
    ) -> Self {
        Self {
            final_text: final_text.into(),
            source_label: source_label.into(),
            log,
            survivors,
        }
    }

    /// The log as one newline-joined block
    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_text_joins_lines() {
        let result = DecisionResult::new(
            "answer",
            labels::winner("Odin"),
            vec!["one".to_string(), "two".to_string()],
            BTreeSet::from(["Odin".to_string()]),
        );
        assert_eq!(result.log_text(), "one\ntwo");
        assert_eq!(result.source_label, "Winner: Odin");
    }

    #[test]
    fn test_labels() {
        assert_eq!(labels::upheld("Athena"), "Verdict: Athena (Upheld)");
        assert_eq!(
            labels::upheld_unrefined("Athena"),
            "Verdict: Athena (Upheld, refinement failed)"
        );
        assert_eq!(labels::judge_verdict("llama3"), "Judge Verdict (llama3)");
        assert_eq!(
            labels::winner(&labels::post_mortem("llama3")),
            "Winner: Judge llama3 (Post-Mortem)"
        );
    }
}
