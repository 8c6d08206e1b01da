//! Output formatter trait

use conclave_domain::{CandidateSet, DecisionProtocol, DecisionResult};

/// Everything a formatter needs about one finished decision
#[derive(Debug, Clone, Copy)]
pub struct DecisionReport<'a> {
    pub question: &'a str,
    pub protocol: DecisionProtocol,
    pub candidates: &'a CandidateSet,
    pub result: &'a DecisionResult,
}

/// Trait for formatting decision results
pub trait OutputFormatter {
    /// Format the complete decision: candidates, deliberation log and answer
    fn format(&self, report: &DecisionReport<'_>) -> String;

    /// Format as JSON
    fn format_json(&self, report: &DecisionReport<'_>) -> String;

    /// Format the final answer only (concise output)
    fn format_final_only(&self, report: &DecisionReport<'_>) -> String;
}
