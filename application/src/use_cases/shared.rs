//! Shared utilities for use cases.
//!
//! Log helpers and the streamed judge call used by JudgeReview and
//! RunDecision.

use crate::ports::deliberation_logger::{DeliberationEvent, DeliberationLogger};
use crate::ports::oracle::{ChatOptions, Oracle, OracleError};
use crate::ports::progress::DecisionProgress;
use crate::use_cases::collect_ballots::{CollectedLists, VoterOutcome};
use conclave_domain::{CandidateSet, DecisionContext, RoundRecord};

/// Every response as `**name**:` blocks
pub(crate) fn aggregate(candidates: &CandidateSet) -> String {
    candidates
        .iter()
        .map(|c| format!("**{}**:\n{}", c.name, c.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Append a line to the deliberation log and forward it to progress.
pub(crate) fn note(
    ctx: &mut DecisionContext,
    progress: &dyn DecisionProgress,
    line: impl Into<String>,
) {
    let line = line.into();
    progress.on_log(&line);
    ctx.log(line);
}

/// Record round records in the context, progress and the event log.
pub(crate) fn note_rounds(
    ctx: &mut DecisionContext,
    progress: &dyn DecisionProgress,
    logger: &dyn DeliberationLogger,
    rounds: &[RoundRecord],
) {
    for record in rounds {
        progress.on_log(&record.narrative);
        logger.log(DeliberationEvent::new(
            "round",
            serde_json::json!({
                "round": record.round,
                "tally": record.tally,
                "narrative": record.narrative,
            }),
        ));
    }
    ctx.record_rounds(rounds);
}

/// Emit one event per voter and log the disenfranchised ones.
pub(crate) fn note_ballots(
    ctx: &mut DecisionContext,
    progress: &dyn DecisionProgress,
    logger: &dyn DeliberationLogger,
    kind: &'static str,
    collected: &CollectedLists,
) {
    for (voter, outcome) in &collected.outcomes {
        let (status, detail) = match outcome {
            VoterOutcome::Cast(_) => ("cast", None),
            VoterOutcome::Malformed => ("malformed", None),
            VoterOutcome::Failed(reason) => ("failed", Some(reason.as_str())),
        };
        logger.log(DeliberationEvent::new(
            kind,
            serde_json::json!({
                "voter": voter,
                "status": status,
                "list": outcome.names(),
                "error": detail,
            }),
        ));
    }
    for (voter, outcome) in collected.disenfranchised() {
        let line = match outcome {
            VoterOutcome::Failed(reason) => {
                format!("Voter disenfranchised: {} ({})", voter, reason)
            }
            _ => format!("Voter disenfranchised: {}", voter),
        };
        note(ctx, progress, line);
    }
}

/// Run a judge call as a stream, forwarding chunks to progress, and drain it.
pub(crate) async fn stream_judge<O: Oracle + ?Sized>(
    oracle: &O,
    model: &str,
    prompt: &str,
    options: &ChatOptions,
    progress: &dyn DecisionProgress,
) -> Result<String, OracleError> {
    let handle = oracle.chat_streaming(model, prompt, options).await?;
    handle
        .collect_text_with(|chunk| progress.on_stream_chunk(model, chunk))
        .await
}
