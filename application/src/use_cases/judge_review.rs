//! Judge Review use case
//!
//! Two judge-driven protocols:
//!
//! - **Arbiter**: the judge reads every response and answers alone.
//! - **Judge & Jury**: the agents vote by instant runoff, then the judge
//!   reviews the jury's pick.
//!
//! ```text
//!            ┌──────────────── mistrial (seeded retrial) ───────────────┐
//!            ▼                                                          │
//!  Voting ──► IRV ──► Review ──► UPHOLD ──► refine winner ──► done      │
//!             │          │                                              │
//!             │          └──► OVERTURN / ambiguous ── retries left? ────┤
//!             │                                        │ no             │
//!             └──► no clear winner ── retries left? ───┼────────────────┘
//!                                                      ▼
//!                                             Hung Jury: judge rules
//! ```
//!
//! Judge call failures end the run with a degraded result and are never
//! retried. The degraded result still carries the candidate content: the
//! upheld winner when only refinement failed, every response otherwise.

use crate::config::DecisionParams;
use crate::ports::deliberation_logger::{DeliberationEvent, DeliberationLogger};
use crate::ports::oracle::{ChatOptions, Oracle};
use crate::ports::progress::{DecisionProgress, DecisionStage};
use crate::use_cases::collect_ballots::{CollectBallotsUseCase, CollectionRequest, ListKind};
use crate::use_cases::shared::{aggregate, note, note_ballots, note_rounds, stream_judge};
use conclave_domain::{
    CandidateSet, DecisionContext, DecisionPrompt, IrvWinner, Verdict, labels, parse_verdict,
    run_irv,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Final text and source label of a judged decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruling {
    pub final_text: String,
    pub source_label: String,
}

impl Ruling {
    pub fn new(final_text: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            final_text: final_text.into(),
            source_label: source_label.into(),
        }
    }

    /// Degraded result of a failed judge call, followed by every response
    pub fn judgment_failed(candidates: &CandidateSet) -> Self {
        Self::new(
            format!("{}\n\n{}", labels::JUDGMENT_FAILED, aggregate(candidates)),
            labels::ERROR,
        )
    }

    pub fn is_error(&self) -> bool {
        self.source_label == labels::ERROR
    }
}

/// Everything a judged decision reads
#[derive(Debug, Clone)]
pub struct ReviewInput<'a> {
    pub question: &'a str,
    pub candidates: &'a Arc<CandidateSet>,
    pub judge: &'a str,
    pub params: &'a DecisionParams,
}

/// Use case for judge-driven protocols
pub struct JudgeReviewUseCase<O: Oracle + 'static> {
    oracle: Arc<O>,
    ballots: CollectBallotsUseCase<O>,
    logger: Arc<dyn DeliberationLogger>,
}

impl<O: Oracle + 'static> JudgeReviewUseCase<O> {
    pub fn new(oracle: Arc<O>, logger: Arc<dyn DeliberationLogger>) -> Self {
        Self {
            ballots: CollectBallotsUseCase::new(Arc::clone(&oracle)),
            oracle,
            logger,
        }
    }

    /// Solo arbiter: the judge synthesizes or picks the answer directly
    pub async fn arbitrate(
        &self,
        input: &ReviewInput<'_>,
        ctx: &mut DecisionContext,
        progress: &dyn DecisionProgress,
    ) -> Ruling {
        info!(judge = %input.judge, "Arbiter reviewing {} responses", input.candidates.len());
        note(
            ctx,
            progress,
            format!("{} is reviewing the arguments (No Jury)...", input.judge),
        );
        progress.on_stage_start(&DecisionStage::Judging, 1);

        let prompt = DecisionPrompt::arbiter(input.question, input.candidates);
        let result = stream_judge(
            self.oracle.as_ref(),
            input.judge,
            &prompt,
            &ChatOptions::default(),
            progress,
        )
        .await;

        let ruling = match result {
            Ok(text) => {
                progress.on_task_complete(&DecisionStage::Judging, input.judge, true);
                Ruling::new(text, labels::judge_verdict(input.judge))
            }
            Err(e) => {
                warn!(judge = %input.judge, "Arbiter failed: {}", e);
                progress.on_task_complete(&DecisionStage::Judging, input.judge, false);
                note(ctx, progress, format!("Judge failed to answer: {}", e));
                Ruling::judgment_failed(input.candidates)
            }
        };
        progress.on_stage_complete(&DecisionStage::Judging);
        ruling
    }

    /// Jury vote followed by judge review, with bounded mistrials
    pub async fn judge_and_jury(
        &self,
        input: &ReviewInput<'_>,
        ctx: &mut DecisionContext,
        progress: &dyn DecisionProgress,
    ) -> Ruling {
        let params = input.params;
        let names = input.candidates.name_set();
        let mut seed: Option<u64> = None;

        loop {
            match seed {
                Some(seed) => note(
                    ctx,
                    progress,
                    format!("MISTRIAL DECLARED. Empaneling new Jury (Seed: {})...", seed),
                ),
                None => note(
                    ctx,
                    progress,
                    "THE JURY DELIBERATES: Agents are casting ranked votes...",
                ),
            }

            // Retrials re-roll both the jury and the judge
            let (ballot_options, verdict_options) = match seed {
                Some(seed) => {
                    let retrial = ChatOptions::default()
                        .with_temperature(params.mistrial_temperature)
                        .with_seed(seed);
                    (retrial, retrial)
                }
                None => (
                    ChatOptions::default().with_temperature_opt(params.ballot_temperature),
                    ChatOptions::default().with_temperature(params.verdict_temperature),
                ),
            };

            let collected = self
                .ballots
                .execute(
                    CollectionRequest {
                        question: input.question.to_string(),
                        candidates: Arc::clone(input.candidates),
                        kind: ListKind::Ballot,
                        options: ballot_options,
                        excerpt_len: params.excerpt_len,
                        timeout: params.voter_timeout,
                        parallelism: params.parallelism(input.candidates.len()),
                    },
                    progress,
                )
                .await;
            note_ballots(ctx, progress, self.logger.as_ref(), "ballot", &collected);

            let outcome = run_irv(&collected.ballots(), &names);
            note_rounds(ctx, progress, self.logger.as_ref(), &outcome.rounds);

            let jury_winner = match outcome.winner {
                IrvWinner::Elected(name) => name,
                IrvWinner::NoClearWinner => {
                    note(ctx, progress, "The jury reached no clear winner.");
                    if ctx.retries() < params.max_retries {
                        seed = Some(self.declare_mistrial(ctx));
                        continue;
                    }
                    note(ctx, progress, "No retrials left. Hung Jury.");
                    break;
                }
            };

            note(ctx, progress, format!("Jury Recommendation: {}", jury_winner));
            note(
                ctx,
                progress,
                format!("JUDGE {} is reviewing the verdict...", input.judge),
            );

            progress.on_stage_start(&DecisionStage::Judging, 1);
            let prompt = DecisionPrompt::verdict(input.question, &jury_winner, input.candidates);
            let reply = self
                .oracle
                .chat(input.judge, &prompt, &verdict_options)
                .await;
            let reply = match reply {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(judge = %input.judge, "Verdict call failed: {}", e);
                    progress.on_task_complete(&DecisionStage::Judging, input.judge, false);
                    progress.on_stage_complete(&DecisionStage::Judging);
                    note(ctx, progress, format!("Judge failed to answer: {}", e));
                    return Ruling::judgment_failed(input.candidates);
                }
            };
            progress.on_task_complete(&DecisionStage::Judging, input.judge, true);
            progress.on_stage_complete(&DecisionStage::Judging);

            let verdict = parse_verdict(&reply);
            self.logger.log(DeliberationEvent::new(
                "verdict",
                serde_json::json!({
                    "judge": input.judge,
                    "jury_winner": jury_winner,
                    "verdict": verdict.as_str(),
                    "attempt": ctx.retries() + 1,
                    "seed": seed,
                }),
            ));

            match verdict {
                Verdict::Uphold => {
                    note(
                        ctx,
                        progress,
                        format!("Judge UPHOLDS the Jury's decision ({}).", jury_winner),
                    );
                    return self.refine(input, &jury_winner, ctx, progress).await;
                }
                Verdict::Ambiguous => {
                    warn!(judge = %input.judge, reply = %reply.trim(), "Ambiguous verdict");
                    note(
                        ctx,
                        progress,
                        "Judge gave no clear verdict. Treating it as OVERTURN.",
                    );
                }
                Verdict::Overturn => {}
            }

            if ctx.retries() < params.max_retries {
                note(ctx, progress, "Judge OVERTURNS the Jury! Conflict detected.");
                seed = Some(self.declare_mistrial(ctx));
                continue;
            }
            note(ctx, progress, "Judge OVERTURNS the Jury again! Hung Jury.");
            break;
        }

        self.hung_jury(input, ctx, progress).await
    }

    fn declare_mistrial(&self, ctx: &mut DecisionContext) -> u64 {
        let seed = ctx.declare_mistrial();
        info!(seed, retries = ctx.retries(), "Mistrial declared");
        self.logger.log(DeliberationEvent::new(
            "mistrial",
            serde_json::json!({ "seed": seed, "retries": ctx.retries() }),
        ));
        seed
    }

    async fn refine(
        &self,
        input: &ReviewInput<'_>,
        winner: &str,
        ctx: &mut DecisionContext,
        progress: &dyn DecisionProgress,
    ) -> Ruling {
        let content = input
            .candidates
            .get(winner)
            .map(|c| c.content.as_str())
            .unwrap_or_default();
        let prompt = DecisionPrompt::refine_winner(winner, content);

        progress.on_stage_start(&DecisionStage::Summarizing, 1);
        let result = stream_judge(
            self.oracle.as_ref(),
            input.judge,
            &prompt,
            &ChatOptions::default(),
            progress,
        )
        .await;
        progress.on_task_complete(&DecisionStage::Summarizing, input.judge, result.is_ok());
        progress.on_stage_complete(&DecisionStage::Summarizing);

        match result {
            Ok(text) => Ruling::new(text, labels::upheld(winner)),
            Err(e) => {
                warn!(judge = %input.judge, "Refinement failed: {}", e);
                note(ctx, progress, format!("Judge failed to answer: {}", e));
                Ruling::new(content, labels::upheld_unrefined(winner))
            }
        }
    }

    async fn hung_jury(
        &self,
        input: &ReviewInput<'_>,
        ctx: &mut DecisionContext,
        progress: &dyn DecisionProgress,
    ) -> Ruling {
        note(
            ctx,
            progress,
            format!(
                "SUPREME COURT RULING: Judge {} issues binding verdict.",
                input.judge
            ),
        );

        progress.on_stage_start(&DecisionStage::Judging, 1);
        let prompt = DecisionPrompt::hung_jury(input.question, input.candidates);
        let result = stream_judge(
            self.oracle.as_ref(),
            input.judge,
            &prompt,
            &ChatOptions::default(),
            progress,
        )
        .await;
        progress.on_task_complete(&DecisionStage::Judging, input.judge, result.is_ok());
        progress.on_stage_complete(&DecisionStage::Judging);

        match result {
            Ok(text) => Ruling::new(text, labels::JUDGE_OVERRIDE),
            Err(e) => {
                warn!(judge = %input.judge, "Binding verdict failed: {}", e);
                note(ctx, progress, format!("Judge failed to answer: {}", e));
                Ruling::judgment_failed(input.candidates)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::deliberation_logger::NoDeliberationLogger;
    use crate::ports::oracle::OracleError;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use conclave_domain::Candidate;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    const JUDGE: &str = "judge-model";

    /// Voters always return `ballot`; the judge pops scripted replies
    struct CourtOracle {
        ballot: String,
        judge_replies: Mutex<VecDeque<Result<String, OracleError>>>,
        judge_calls: Mutex<Vec<(String, ChatOptions)>>,
    }

    impl CourtOracle {
        fn new(ballot: &str, judge_replies: Vec<Result<&str, OracleError>>) -> Self {
            Self {
                ballot: ballot.to_string(),
                judge_replies: Mutex::new(
                    judge_replies
                        .into_iter()
                        .map(|r| r.map(String::from))
                        .collect(),
                ),
                judge_calls: Mutex::new(Vec::new()),
            }
        }

        fn judge_call_count(&self) -> usize {
            self.judge_calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Oracle for CourtOracle {
        async fn chat(
            &self,
            model: &str,
            prompt: &str,
            options: &ChatOptions,
        ) -> Result<String, OracleError> {
            if model != JUDGE {
                return Ok(self.ballot.clone());
            }
            self.judge_calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), *options));
            self.judge_replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(OracleError::Other("No more responses".to_string())))
        }
    }

    fn candidates() -> Arc<CandidateSet> {
        Arc::new(CandidateSet::new(vec![
            Candidate::new("Athena", "m1", "Answer A"),
            Candidate::new("Odin", "m2", "Answer O"),
        ]))
    }

    fn use_case(oracle: &Arc<CourtOracle>) -> JudgeReviewUseCase<CourtOracle> {
        JudgeReviewUseCase::new(Arc::clone(oracle), Arc::new(NoDeliberationLogger))
    }

    async fn run_jury(oracle: &Arc<CourtOracle>, params: &DecisionParams) -> (Ruling, DecisionContext) {
        let candidates = candidates();
        let input = ReviewInput {
            question: "q",
            candidates: &candidates,
            judge: JUDGE,
            params,
        };
        let mut ctx = DecisionContext::new(Some(3));
        let ruling = use_case(oracle)
            .judge_and_jury(&input, &mut ctx, &NoProgress)
            .await;
        (ruling, ctx)
    }

    #[tokio::test]
    async fn test_uphold_refines_winner() {
        let oracle = Arc::new(CourtOracle::new(
            r#"["Odin", "Athena"]"#,
            vec![Ok("UPHOLD"), Ok("Refined O")],
        ));
        let (ruling, ctx) = run_jury(&oracle, &DecisionParams::default()).await;

        assert_eq!(ruling, Ruling::new("Refined O", "Verdict: Odin (Upheld)"));
        assert_eq!(ctx.retries(), 0);
        let calls = oracle.judge_calls.lock().unwrap();
        assert!(calls[0].0.contains("THE JURY VOTED FOR: Odin"));
        assert_eq!(calls[0].1.temperature, Some(0.1));
        assert!(calls[1].0.contains("CONTENT:\nAnswer O"));
    }

    #[tokio::test]
    async fn test_overturn_then_uphold_uses_seeded_retrial() {
        let oracle = Arc::new(CourtOracle::new(
            r#"["Athena"]"#,
            vec![Ok("OVERTURN"), Ok("uphold"), Ok("Refined A")],
        ));
        let (ruling, ctx) = run_jury(&oracle, &DecisionParams::default()).await;

        assert_eq!(ruling.source_label, "Verdict: Athena (Upheld)");
        assert_eq!(ctx.retries(), 1);

        let calls = oracle.judge_calls.lock().unwrap();
        let retrial = calls[1].1;
        assert_eq!(retrial.temperature, Some(0.7));
        let seed = retrial.seed.unwrap();
        assert!((1..=1_000_000).contains(&seed));
        let announcement = format!("MISTRIAL DECLARED. Empaneling new Jury (Seed: {})...", seed);
        assert!(ctx.lines().contains(&announcement));
    }

    #[tokio::test]
    async fn test_double_overturn_is_hung_jury() {
        let oracle = Arc::new(CourtOracle::new(
            r#"["Athena"]"#,
            vec![Ok("OVERTURN"), Ok("OVERTURN"), Ok("Binding answer")],
        ));
        let (ruling, ctx) = run_jury(&oracle, &DecisionParams::default()).await;

        assert_eq!(ruling, Ruling::new("Binding answer", "Verdict: Judge Override"));
        assert_eq!(ctx.retries(), 1);
        assert_eq!(oracle.judge_call_count(), 3);
        let calls = oracle.judge_calls.lock().unwrap();
        assert!(calls[2].0.contains("The Jury is hung"));
    }

    #[tokio::test]
    async fn test_ambiguous_verdict_routes_to_overturn() {
        let oracle = Arc::new(CourtOracle::new(
            r#"["Athena"]"#,
            vec![Ok("I UPHOLD and OVERTURN"), Ok("Binding answer")],
        ));
        let params = DecisionParams::default().with_max_retries(0);
        let (ruling, ctx) = run_jury(&oracle, &params).await;

        assert_eq!(ruling.source_label, labels::JUDGE_OVERRIDE);
        assert!(ctx.lines().iter().any(|l| l.contains("no clear verdict")));
    }

    #[tokio::test]
    async fn test_retries_never_exceed_bound() {
        for max_retries in 0..4 {
            let replies = (0..=max_retries).map(|_| Ok("OVERTURN")).chain([Ok("final")]);
            let oracle = Arc::new(CourtOracle::new(r#"["Odin"]"#, replies.collect()));
            let params = DecisionParams::default().with_max_retries(max_retries);
            let (ruling, ctx) = run_jury(&oracle, &params).await;

            assert_eq!(ctx.retries(), max_retries);
            assert_eq!(ruling.source_label, labels::JUDGE_OVERRIDE);
            assert_eq!(oracle.judge_call_count(), max_retries + 2);
        }
    }

    #[tokio::test]
    async fn test_no_clear_winner_is_mistrial_without_judge_review() {
        let oracle = Arc::new(CourtOracle::new("no idea", vec![Ok("Binding answer")]));
        let (ruling, ctx) = run_jury(&oracle, &DecisionParams::default()).await;

        assert_eq!(ruling.source_label, labels::JUDGE_OVERRIDE);
        assert_eq!(ctx.retries(), 1);
        // Only the binding verdict reached the judge
        assert_eq!(oracle.judge_call_count(), 1);
        assert!(ctx.lines().iter().any(|l| l.starts_with("Voter disenfranchised: Athena")));
    }

    #[tokio::test]
    async fn test_judge_failure_is_terminal() {
        let oracle = Arc::new(CourtOracle::new(
            r#"["Odin"]"#,
            vec![Err(OracleError::Connection("refused".to_string()))],
        ));
        let (ruling, ctx) = run_jury(&oracle, &DecisionParams::default()).await;

        assert!(ruling.is_error());
        assert_eq!(
            ruling.final_text,
            "Judgment failed.\n\n**Athena**:\nAnswer A\n\n**Odin**:\nAnswer O"
        );
        assert_eq!(oracle.judge_call_count(), 1);
        assert!(ctx.lines().last().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn test_failed_refinement_keeps_upheld_winner() {
        let oracle = Arc::new(CourtOracle::new(
            r#"["Odin"]"#,
            vec![Ok("UPHOLD"), Err(OracleError::Connection("down".to_string()))],
        ));
        let (ruling, ctx) = run_jury(&oracle, &DecisionParams::default()).await;

        assert_eq!(
            ruling,
            Ruling::new("Answer O", "Verdict: Odin (Upheld, refinement failed)")
        );
        assert!(!ruling.is_error());
        assert_eq!(
            ctx.lines().last().unwrap(),
            "Judge failed to answer: Connection error: down"
        );
    }

    #[tokio::test]
    async fn test_failed_binding_verdict_surfaces_every_response() {
        let oracle = Arc::new(CourtOracle::new(
            r#"["Athena"]"#,
            vec![Ok("OVERTURN"), Err(OracleError::Timeout)],
        ));
        let params = DecisionParams::default().with_max_retries(0);
        let (ruling, _) = run_jury(&oracle, &params).await;

        assert!(ruling.is_error());
        assert!(ruling.final_text.starts_with("Judgment failed.\n\n"));
        assert!(ruling.final_text.contains("**Athena**:\nAnswer A"));
        assert!(ruling.final_text.contains("**Odin**:\nAnswer O"));
    }

    #[tokio::test]
    async fn test_failed_arbiter_surfaces_every_response() {
        let oracle = Arc::new(CourtOracle::new("", vec![Err(OracleError::Timeout)]));
        let candidates = candidates();
        let params = DecisionParams::default();
        let input = ReviewInput {
            question: "q",
            candidates: &candidates,
            judge: JUDGE,
            params: &params,
        };
        let mut ctx = DecisionContext::new(Some(1));
        let ruling = use_case(&oracle).arbitrate(&input, &mut ctx, &NoProgress).await;

        assert_eq!(ruling.source_label, "Error");
        assert_eq!(
            ruling.final_text,
            "Judgment failed.\n\n**Athena**:\nAnswer A\n\n**Odin**:\nAnswer O"
        );
    }

    #[tokio::test]
    async fn test_arbiter() {
        let oracle = Arc::new(CourtOracle::new("", vec![Ok("Arbiter answer")]));
        let candidates = candidates();
        let params = DecisionParams::default();
        let input = ReviewInput {
            question: "q",
            candidates: &candidates,
            judge: JUDGE,
            params: &params,
        };
        let mut ctx = DecisionContext::new(Some(1));
        let ruling = use_case(&oracle).arbitrate(&input, &mut ctx, &NoProgress).await;

        assert_eq!(ruling, Ruling::new("Arbiter answer", "Judge Verdict (judge-model)"));
        let calls = oracle.judge_calls.lock().unwrap();
        assert!(calls[0].0.contains("AGENT Athena:\nAnswer A"));
        assert!(calls[0].0.contains("AGENT Odin:\nAnswer O"));
    }
}
