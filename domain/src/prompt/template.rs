//! Prompt templates for each decision stage

use crate::core::candidate::{Candidate, CandidateSet};
use crate::core::text::{excerpt, excerpt_with_ellipsis};
use crate::elimination::skin::EliminationSkin;

/// Templates for generating prompts at each stage
pub struct DecisionPrompt;

impl DecisionPrompt {
    /// Initial question sent to every agent when candidates are generated
    pub fn initial_query(question: &str) -> String {
        format!(
            r#"Please answer the following question:

{}

Provide a clear, well-structured response."#,
            question
        )
    }

    /// Ranked ballot request. Voters may rank their own response.
    pub fn ballot(
        question: &str,
        voter: &str,
        candidates: &CandidateSet,
        excerpt_len: usize,
    ) -> String {
        let names = candidates.names();
        let mut evidence = String::new();
        for c in candidates {
            evidence.push_str(&format!(
                "---\nNAME: {}\nRESPONSE: {}\n",
                c.name,
                excerpt(&c.content, excerpt_len)
            ));
        }

        let example = names
            .iter()
            .take(2)
            .map(|n| format!("\"{}\"", n))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"Evaluate the following Candidate Responses for this query: "{question}"
CANDIDATES: {candidates}

EVIDENCE:
{evidence}
TASK: Rank the top 3 best responses.
NOTE: You are {voter}. You MAY vote for yourself if you believe your
response is the most accurate.

OUTPUT: Return ONLY a JSON list of names. No explanation.
Example: [{example}]"#,
            question = question,
            candidates = names.join(", "),
            evidence = evidence,
            voter = voter,
            example = example,
        )
    }

    /// Elimination nomination request. The nominator never sees itself.
    pub fn nomination(
        skin: EliminationSkin,
        question: &str,
        nominator: &str,
        candidates: &CandidateSet,
        excerpt_len: usize,
    ) -> String {
        let peers = candidates.iter().filter(|c| c.name != nominator);

        match skin {
            EliminationSkin::BattleRoyale => {
                let mut targets = String::new();
                for c in peers {
                    targets.push_str(&format!(
                        "---\nTARGET: {}\nRESPONSE:\n{}\n",
                        c.name,
                        excerpt_with_ellipsis(&c.content, excerpt_len)
                    ));
                }
                format!(
                    r#"You are a ruthless judge in a 'Fight to the Death' debate arena.
TASK:
1. Read the User Query: "{}"
2. Analyze the TARGET RESPONSES below.
3. Identify the WEAKEST, most boring, or hallucinatory responses.
4. Create a HIT LIST of who should be eliminated, ordered from WORST to BEST.
TARGETS: {}
OUTPUT FORMAT: Return ONLY a JSON list of agent names."#,
                    question, targets
                )
            }
            EliminationSkin::RetirementLounge => {
                let mut listing = String::new();
                for c in peers {
                    listing.push_str(&format!(
                        "---\nCANDIDATE: {}\nRESPONSE:\n{}\n",
                        c.name,
                        excerpt_with_ellipsis(&c.content, excerpt_len)
                    ));
                }
                format!(
                    r#"You are an expert curator in 'The Retirement Lounge', a place where high-performing agents are recognized for their service.
TASK:
1. Read the User Query: "{}"
2. Analyze the CANDIDATE RESPONSES below.
3. Identify which responses, while valuable, are slightly less optimal, less detailed, or less aligned with the query than others.
4. Create a RETIREMENT LIST of agents who should be gracefully retired first, ordered from LEAST optimal to MOST optimal.
CANDIDATES: {}
OUTPUT FORMAT: Return ONLY a JSON list of agent names. Use the EXACT names provided."#,
                    question, listing
                )
            }
        }
    }

    /// Judge review of the jury's recommendation
    pub fn verdict(question: &str, jury_winner: &str, candidates: &CandidateSet) -> String {
        format!(
            r#"ACT AS A SUPREME COURT JUDGE.
USER PROMPT: {}
THE JURY VOTED FOR: {}

ALL ARGUMENTS:
{}

TASK: Do you UPHOLD the jury's decision or OVERTURN it?
If the jury's winner is reasonable, UPHOLD it.
Only OVERTURN if another answer is objectively superior.

OUTPUT: Reply ONLY with the word "UPHOLD" or "OVERTURN"."#,
            question,
            jury_winner,
            Self::arguments(candidates.iter())
        )
    }

    /// Refinement of an upheld winner
    pub fn refine_winner(winner: &str, content: &str) -> String {
        format!(
            "Summarize and refine the winning answer from {}.\n\nCONTENT:\n{}",
            winner, content
        )
    }

    /// Final ruling after the jury is hung
    pub fn hung_jury(question: &str, candidates: &CandidateSet) -> String {
        format!(
            r#"The Jury is hung. You have final authority.
Review all answers to '{}' and generate the best possible response.

ALL ARGUMENTS:
{}"#,
            question,
            Self::arguments(candidates.iter())
        )
    }

    /// Solo arbiter ruling
    pub fn arbiter(question: &str, candidates: &CandidateSet) -> String {
        format!(
            "USER QUERY: {}\n\nAGENT RESPONSES:\n{}\n\nINSTRUCTION: Act as a final judge. Synthesize the best answer or pick a winner.",
            question,
            Self::arguments(candidates.iter())
        )
    }

    /// Post-mortem synthesis over the finalists of a wiped-out tournament
    pub fn necromancer<'a>(
        skin: EliminationSkin,
        question: &str,
        finalists: impl IntoIterator<Item = &'a Candidate>,
    ) -> String {
        let arguments = Self::arguments(finalists);
        match skin {
            EliminationSkin::BattleRoyale => format!(
                r#"The debate arena has ended in a mutual kill.
You are the NECROMANCER JUDGE.
Review the final arguments from the fallen agents below and construct the BEST POSSIBLE ANSWER.

USER PROMPT: {}

FINALIST ARGUMENTS:
{}"#,
                question, arguments
            ),
            EliminationSkin::RetirementLounge => format!(
                r#"Every member of the lounge has retired at once.
You are the ARCHIVE CURATOR.
Review the last contributions of the retired members below and assemble the BEST POSSIBLE ANSWER from them.

USER PROMPT: {}

ARCHIVED CONTRIBUTIONS:
{}"#,
                question, arguments
            ),
        }
    }

    /// Summary of a tournament's winning answer
    pub fn summarize(question: &str, winning_text: &str) -> String {
        format!(
            r#"You are an expert synthesizer.
Task:
1. Restate the original User Query clearly.
2. Summarize the WINNING ANSWER below. Retain key technical details, code blocks, and insights.
3. Remove any "As an AI" fluff.

USER QUERY: {}
WINNING ANSWER: {}"#,
            question, winning_text
        )
    }

    fn arguments<'a>(candidates: impl IntoIterator<Item = &'a Candidate>) -> String {
        candidates
            .into_iter()
            .map(|c| format!("AGENT {}:\n{}", c.name, c.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> CandidateSet {
        CandidateSet::new(vec![
            Candidate::new("Athena", "llama3", "Use a B-tree."),
            Candidate::new("Odin", "qwen2", "x".repeat(1000)),
        ])
    }

    #[test]
    fn test_ballot_lists_every_candidate_and_voter() {
        let prompt = DecisionPrompt::ballot("Which index?", "Odin", &candidates(), 800);
        assert!(prompt.contains("CANDIDATES: Athena, Odin"));
        assert!(prompt.contains("You are Odin"));
        assert!(prompt.contains("Example: [\"Athena\", \"Odin\"]"));
        assert!(!prompt.contains(&"x".repeat(801)));
    }

    #[test]
    fn test_nomination_excludes_nominator() {
        let prompt = DecisionPrompt::nomination(
            EliminationSkin::BattleRoyale,
            "Which index?",
            "Athena",
            &candidates(),
            800,
        );
        assert!(!prompt.contains("TARGET: Athena"));
        assert!(prompt.contains("TARGET: Odin"));
        assert!(prompt.contains("..."));
    }

    #[test]
    fn test_retirement_nomination_wording() {
        let prompt = DecisionPrompt::nomination(
            EliminationSkin::RetirementLounge,
            "q",
            "Odin",
            &candidates(),
            800,
        );
        assert!(prompt.contains("Retirement Lounge"));
        assert!(prompt.contains("CANDIDATE: Athena"));
        assert!(!prompt.contains("CANDIDATE: Odin"));
    }

    #[test]
    fn test_verdict_names_jury_winner() {
        let prompt = DecisionPrompt::verdict("q", "Athena", &candidates());
        assert!(prompt.contains("THE JURY VOTED FOR: Athena"));
        assert!(prompt.contains("AGENT Athena:\nUse a B-tree."));
        assert!(prompt.contains("\"UPHOLD\" or \"OVERTURN\""));
    }

    #[test]
    fn test_necromancer_only_finalists() {
        let set = candidates();
        let finalists = set.iter().filter(|c| c.name == "Athena");
        let prompt = DecisionPrompt::necromancer(EliminationSkin::BattleRoyale, "q", finalists);
        assert!(prompt.contains("NECROMANCER JUDGE"));
        assert!(prompt.contains("AGENT Athena"));
        assert!(!prompt.contains("AGENT Odin"));
    }

    #[test]
    fn test_necromancer_follows_skin() {
        let set = candidates();
        let prompt = DecisionPrompt::necromancer(EliminationSkin::RetirementLounge, "q", set.iter());
        assert!(prompt.contains("ARCHIVE CURATOR"));
        assert!(!prompt.contains("mutual kill"));
        assert!(!prompt.contains("NECROMANCER"));
        assert!(prompt.contains("AGENT Odin"));
    }
}
