//! Console output formatter for decision results

use crate::output::formatter::{DecisionReport, OutputFormatter};
use colored::Colorize;

/// Formats decision results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete decision
    pub fn format(report: &DecisionReport<'_>) -> String {
        let result = report.result;
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Conclave Decision"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            report.question
        ));
        output.push_str(&format!(
            "{} {}\n\n",
            "Protocol:".cyan().bold(),
            report.protocol.title()
        ));

        // Candidates
        output.push_str(&Self::section_header("Candidates"));
        for candidate in report.candidates {
            let heading = format!("── {} ({}) ──", candidate.name, candidate.model_tag);
            let heading = if result.survivors.contains(&candidate.name) {
                heading.yellow().bold()
            } else {
                heading.dimmed()
            };
            output.push_str(&format!("\n{}\n{}\n", heading, candidate.content));
        }

        // Deliberation log
        if !result.log.is_empty() {
            output.push_str(&Self::section_header("Deliberation"));
            for line in &result.log {
                output.push_str(&format!("  {} {}\n", "*".cyan(), line));
            }
        }

        // Final answer
        output.push_str(&Self::section_header("Decision"));
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!("Source: {}", result.source_label).yellow().bold(),
            result.final_text
        ));

        if !result.survivors.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Survivors:".green().bold(),
                result.survivors.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &DecisionReport<'_>) -> String {
        let result = report.result;
        let value = serde_json::json!({
            "question": report.question,
            "protocol": report.protocol,
            "final_text": result.final_text,
            "source_label": result.source_label,
            "log_text": result.log_text(),
            "survivors": result.survivors,
            "candidates": report.candidates,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_final_only(report: &DecisionReport<'_>) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Conclave Decision ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), report.question));
        output.push_str(&format!(
            "{} {}\n\n",
            "Decided by:".dimmed(),
            report.result.source_label
        ));
        output.push_str(&report.result.final_text);
        output.push('\n');

        output
    }

    /// Turn off ANSI colors for everything printed afterwards
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &DecisionReport<'_>) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &DecisionReport<'_>) -> String {
        Self::format_json(report)
    }

    fn format_final_only(&self, report: &DecisionReport<'_>) -> String {
        Self::format_final_only(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conclave_domain::{Candidate, CandidateSet, DecisionProtocol, DecisionResult};
    use std::collections::BTreeSet;

    fn fixture() -> (CandidateSet, DecisionResult) {
        let candidates = CandidateSet::new(vec![
            Candidate::new("Zeus", "llama3", "Use tabs."),
            Candidate::new("Athena", "qwen", "Use spaces."),
        ]);
        let result = DecisionResult::new(
            "Use spaces.",
            "Ranked Choice Winner: Athena",
            vec!["Round 1: Athena wins with 2 of 2 votes.".to_string()],
            BTreeSet::from(["Athena".to_string(), "Zeus".to_string()]),
        );
        (candidates, result)
    }

    #[test]
    fn test_json_output() {
        let (candidates, result) = fixture();
        let report = DecisionReport {
            question: "Tabs?",
            protocol: DecisionProtocol::RankedChoice,
            candidates: &candidates,
            result: &result,
        };
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&report)).unwrap();

        assert_eq!(value["protocol"], "ranked_choice");
        assert_eq!(value["source_label"], "Ranked Choice Winner: Athena");
        assert_eq!(value["log_text"], "Round 1: Athena wins with 2 of 2 votes.");
        assert_eq!(value["survivors"][0], "Athena");
        assert_eq!(value["candidates"][1]["name"], "Athena");
    }

    #[test]
    fn test_full_output_contains_every_section() {
        colored::control::set_override(false);
        let (candidates, result) = fixture();
        let report = DecisionReport {
            question: "Tabs?",
            protocol: DecisionProtocol::RankedChoice,
            candidates: &candidates,
            result: &result,
        };
        let text = ConsoleFormatter::format(&report);

        assert!(text.contains("── Zeus (llama3) ──"));
        assert!(text.contains("Round 1: Athena wins"));
        assert!(text.contains("Source: Ranked Choice Winner: Athena"));
        assert!(text.contains("Survivors: Athena, Zeus"));
    }

    #[test]
    fn test_final_only() {
        colored::control::set_override(false);
        let (candidates, result) = fixture();
        let report = DecisionReport {
            question: "Tabs?",
            protocol: DecisionProtocol::RankedChoice,
            candidates: &candidates,
            result: &result,
        };
        let text = ConsoleFormatter::format_final_only(&report);
        assert!(text.ends_with("Use spaces.\n"));
        assert!(!text.contains("Round 1"));
    }
}
