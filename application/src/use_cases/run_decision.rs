//! Run Decision use case
//!
//! Turns a set of candidate responses into one decision under the selected
//! protocol.
//!
//! | Protocol | Agents vote? | Judge | Label |
//! |----------|--------------|-------|-------|
//! | None | no | - | `Standard Aggregation` |
//! | Arbiter | no | required | `Judge Verdict (<judge>)` |
//! | Ranked Choice | ballots | - | `Ranked Choice Winner: <name>` |
//! | Judge & Jury | ballots | required | `Verdict: ...` |
//! | Elimination | nominations | optional | `Winner: <name>` |
//!
//! A single candidate short-circuits every protocol. A protocol that needs a
//! judge but has none falls back to aggregation.

use crate::config::DecisionParams;
use crate::ports::deliberation_logger::{
    DeliberationEvent, DeliberationLogger, NoDeliberationLogger,
};
use crate::ports::oracle::{ChatOptions, Oracle};
use crate::ports::progress::{DecisionProgress, DecisionStage, NoProgress};
use crate::use_cases::collect_ballots::{CollectBallotsUseCase, CollectionRequest, ListKind};
use crate::use_cases::judge_review::{JudgeReviewUseCase, ReviewInput, Ruling};
use crate::use_cases::shared::{aggregate, note, note_ballots, note_rounds};
use conclave_domain::{
    CandidateSet, DecisionContext, DecisionPrompt, DecisionProtocol, DecisionResult,
    EliminationSkin, IrvWinner, Narrator, labels, run_elimination, run_irv,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur before a decision starts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunDecisionError {
    #[error("No candidates submitted for a decision")]
    NoCandidates,
}

/// Input for the RunDecision use case
#[derive(Debug, Clone)]
pub struct RunDecisionInput {
    pub question: String,
    pub candidates: CandidateSet,
    pub protocol: DecisionProtocol,
    pub judge_model: Option<String>,
    pub params: DecisionParams,
}

impl RunDecisionInput {
    pub fn new(
        question: impl Into<String>,
        candidates: CandidateSet,
        protocol: DecisionProtocol,
    ) -> Self {
        Self {
            question: question.into(),
            candidates,
            protocol,
            judge_model: None,
            params: DecisionParams::default(),
        }
    }

    pub fn with_judge(mut self, judge: impl Into<String>) -> Self {
        self.judge_model = Some(judge.into());
        self
    }

    pub fn with_params(mut self, params: DecisionParams) -> Self {
        self.params = params;
        self
    }

    /// The judge model, ignoring blank values
    fn judge(&self) -> Option<&str> {
        self.judge_model
            .as_deref()
            .map(str::trim)
            .filter(|judge| !judge.is_empty())
    }
}

/// Use case for running a decision
pub struct RunDecisionUseCase<O: Oracle + 'static> {
    oracle: Arc<O>,
    ballots: CollectBallotsUseCase<O>,
    judge_review: JudgeReviewUseCase<O>,
    logger: Arc<dyn DeliberationLogger>,
}

impl<O: Oracle + 'static> RunDecisionUseCase<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        let logger: Arc<dyn DeliberationLogger> = Arc::new(NoDeliberationLogger);
        Self {
            ballots: CollectBallotsUseCase::new(Arc::clone(&oracle)),
            judge_review: JudgeReviewUseCase::new(Arc::clone(&oracle), Arc::clone(&logger)),
            oracle,
            logger,
        }
    }

    pub fn with_deliberation_logger(mut self, logger: Arc<dyn DeliberationLogger>) -> Self {
        self.judge_review = JudgeReviewUseCase::new(Arc::clone(&self.oracle), Arc::clone(&logger));
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDecisionInput,
    ) -> Result<DecisionResult, RunDecisionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDecisionInput,
        progress: &dyn DecisionProgress,
    ) -> Result<DecisionResult, RunDecisionError> {
        if input.candidates.is_empty() {
            return Err(RunDecisionError::NoCandidates);
        }

        let mut ctx = DecisionContext::new(input.params.rng_seed);

        if let Some(only) = input.candidates.single() {
            info!("Single candidate {}, skipping {}", only.name, input.protocol);
            note(
                &mut ctx,
                progress,
                format!("Only {} answered. No decision needed.", only.name),
            );
            let result = ctx.finish(
                only.content.clone(),
                only.name.clone(),
                BTreeSet::from([only.name.clone()]),
            );
            self.log_result(&input, &result);
            return Ok(result);
        }

        info!(
            "Running {} over {} candidates",
            input.protocol.title(),
            input.candidates.len()
        );
        note(
            &mut ctx,
            progress,
            format!("Arena Initialized: {} Mode", input.protocol.title()),
        );

        let judge = input.judge();
        let candidates = Arc::new(input.candidates.clone());
        let everyone = candidates.name_set();

        let result = match (input.protocol, judge) {
            (DecisionProtocol::Aggregate, _) => {
                note(
                    &mut ctx,
                    progress,
                    "No combat requested. Aggregating all intelligence outputs.",
                );
                ctx.finish(aggregate(&candidates), labels::AGGREGATION, everyone)
            }
            (DecisionProtocol::Arbiter | DecisionProtocol::JudgeAndJury, None) => {
                warn!("{} requires a judge; falling back to aggregation", input.protocol);
                note(
                    &mut ctx,
                    progress,
                    format!(
                        "{} requires a judge, but no judge configured. Aggregating all intelligence outputs.",
                        input.protocol.title()
                    ),
                );
                ctx.finish(aggregate(&candidates), labels::AGGREGATION_NO_JUDGE, everyone)
            }
            (DecisionProtocol::Arbiter, Some(judge)) => {
                let review = ReviewInput {
                    question: &input.question,
                    candidates: &candidates,
                    judge,
                    params: &input.params,
                };
                let Ruling {
                    final_text,
                    source_label,
                } = self.judge_review.arbitrate(&review, &mut ctx, progress).await;
                ctx.finish(final_text, source_label, everyone)
            }
            (DecisionProtocol::JudgeAndJury, Some(judge)) => {
                let review = ReviewInput {
                    question: &input.question,
                    candidates: &candidates,
                    judge,
                    params: &input.params,
                };
                let Ruling {
                    final_text,
                    source_label,
                } = self
                    .judge_review
                    .judge_and_jury(&review, &mut ctx, progress)
                    .await;
                ctx.finish(final_text, source_label, everyone)
            }
            (DecisionProtocol::RankedChoice, _) => {
                self.ranked_choice(&input, &candidates, ctx, progress).await
            }
            (DecisionProtocol::Elimination(skin), judge) => {
                self.elimination(&input, skin, judge, &candidates, ctx, progress)
                    .await
            }
        };

        self.log_result(&input, &result);
        Ok(result)
    }

    async fn ranked_choice(
        &self,
        input: &RunDecisionInput,
        candidates: &Arc<CandidateSet>,
        mut ctx: DecisionContext,
        progress: &dyn DecisionProgress,
    ) -> DecisionResult {
        note(&mut ctx, progress, "Ranked Choice Voting initialized...");

        let options = ChatOptions::default().with_temperature_opt(input.params.ballot_temperature);
        let collected = self
            .ballots
            .execute(
                self.request(input, candidates, ListKind::Ballot, options),
                progress,
            )
            .await;
        note_ballots(&mut ctx, progress, self.logger.as_ref(), "ballot", &collected);

        let outcome = run_irv(&collected.ballots(), &candidates.name_set());
        note_rounds(&mut ctx, progress, self.logger.as_ref(), &outcome.rounds);

        let everyone = candidates.name_set();
        match outcome.winner {
            IrvWinner::Elected(winner) => {
                note(&mut ctx, progress, format!("VOTE COMPLETE: {} won.", winner));
                let content = candidates
                    .get(&winner)
                    .map(|c| c.content.clone())
                    .unwrap_or_default();
                ctx.finish(content, labels::ranked_choice_winner(&winner), everyone)
            }
            IrvWinner::NoClearWinner => {
                note(&mut ctx, progress, "VOTE COMPLETE: no clear winner.");
                ctx.finish(aggregate(candidates), labels::NO_CLEAR_WINNER, everyone)
            }
        }
    }

    async fn elimination(
        &self,
        input: &RunDecisionInput,
        skin: EliminationSkin,
        judge: Option<&str>,
        candidates: &Arc<CandidateSet>,
        mut ctx: DecisionContext,
        progress: &dyn DecisionProgress,
    ) -> DecisionResult {
        let params = &input.params;
        let narrator = Narrator::new(skin).with_lines(params.narrative_lines.clone());
        let skin_labels = narrator.labels();

        note(
            &mut ctx,
            progress,
            "Agents are nominating the peers they would remove first...",
        );
        let options = ChatOptions::default().with_temperature(params.nomination_temperature);
        let collected = self
            .ballots
            .execute(
                self.request(input, candidates, ListKind::Nomination(skin), options),
                progress,
            )
            .await;
        note_ballots(&mut ctx, progress, self.logger.as_ref(), "nomination", &collected);

        let nominations = collected.lists();
        for (voter, targets) in &nominations {
            if !targets.is_empty() {
                note(&mut ctx, progress, narrator.nominations(voter, targets));
            }
        }

        let outcome = run_elimination(
            &nominations,
            &candidates.name_set(),
            &narrator,
            ctx.rng_mut(),
        );
        note_rounds(&mut ctx, progress, self.logger.as_ref(), &outcome.rounds);

        let (winner_name, winning_text, summary_model, survivors) = match outcome.survivor() {
            Some(survivor) => {
                note(&mut ctx, progress, narrator.victory(survivor));
                let candidate = candidates.get(survivor);
                (
                    survivor.to_string(),
                    candidate.map(|c| c.content.clone()).unwrap_or_default(),
                    candidate.map(|c| c.model_tag.clone()).unwrap_or_default(),
                    BTreeSet::from([survivor.to_string()]),
                )
            }
            None => {
                note(&mut ctx, progress, skin_labels.wipeout_text);
                let Some(judge) = judge else {
                    self.prune_roster(&mut ctx, progress, &narrator, candidates, &outcome.eliminated, None);
                    return ctx.finish(
                        skin_labels.no_judge_text,
                        skin_labels.wipeout_label,
                        BTreeSet::new(),
                    );
                };

                note(&mut ctx, progress, narrator.judge_entry(judge));
                let finalists = candidates.retain_names(&outcome.finalists);
                let prompt = DecisionPrompt::necromancer(skin, &input.question, finalists.iter());

                progress.on_stage_start(&DecisionStage::Judging, 1);
                let reply = self
                    .oracle
                    .chat(judge, &prompt, &ChatOptions::default())
                    .await;
                progress.on_task_complete(&DecisionStage::Judging, judge, reply.is_ok());
                progress.on_stage_complete(&DecisionStage::Judging);

                match reply {
                    Ok(text) => {
                        note(
                            &mut ctx,
                            progress,
                            "Judge has reconstructed a solution from the finalists.",
                        );
                        (
                            labels::post_mortem(judge),
                            text,
                            judge.to_string(),
                            BTreeSet::new(),
                        )
                    }
                    Err(e) => {
                        warn!(judge = %judge, "Post-mortem synthesis failed: {}", e);
                        note(&mut ctx, progress, format!("Judge failed to answer: {}", e));
                        self.prune_roster(&mut ctx, progress, &narrator, candidates, &outcome.eliminated, Some(judge));
                        let ruling = Ruling::judgment_failed(&finalists);
                        return ctx.finish(ruling.final_text, ruling.source_label, BTreeSet::new());
                    }
                }
            }
        };

        self.prune_roster(
            &mut ctx,
            progress,
            &narrator,
            candidates,
            &outcome.eliminated,
            judge,
        );

        note(
            &mut ctx,
            progress,
            format!("Summarizing victory ({})...", winner_name),
        );
        let summary = self
            .summarize(input, &winning_text, &summary_model, progress)
            .await;
        ctx.finish(summary, labels::winner(&winner_name), survivors)
    }

    /// Log one roster line per eliminated candidate.
    ///
    /// Removal is virtual: callers prune their roster from `survivors`. A
    /// candidate running on the judge's model is reported as spared.
    fn prune_roster(
        &self,
        ctx: &mut DecisionContext,
        progress: &dyn DecisionProgress,
        narrator: &Narrator,
        candidates: &CandidateSet,
        eliminated: &[String],
        judge: Option<&str>,
    ) {
        if eliminated.is_empty() {
            return;
        }
        note(ctx, progress, "Pruning the roster...");
        for name in eliminated {
            let model = candidates
                .get(name)
                .map(|c| c.model_tag.as_str())
                .unwrap_or_default();
            let line = if judge == Some(model) {
                narrator.roster_spared(name, model)
            } else {
                narrator.roster_removed(name, model)
            };
            note(ctx, progress, line);
        }
    }

    async fn summarize(
        &self,
        input: &RunDecisionInput,
        winning_text: &str,
        model: &str,
        progress: &dyn DecisionProgress,
    ) -> String {
        progress.on_stage_start(&DecisionStage::Summarizing, 1);
        let prompt = DecisionPrompt::summarize(&input.question, winning_text);
        let options = ChatOptions::default().with_temperature(input.params.summary_temperature);
        let result = self.oracle.chat(model, &prompt, &options).await;
        progress.on_task_complete(&DecisionStage::Summarizing, model, result.is_ok());
        progress.on_stage_complete(&DecisionStage::Summarizing);

        match result {
            Ok(summary) => summary,
            Err(e) => {
                warn!(model = %model, "Summarization failed: {}", e);
                format!(
                    "Summarization Failed: {}\n\nOriginal Text:\n{}",
                    e, winning_text
                )
            }
        }
    }

    fn request(
        &self,
        input: &RunDecisionInput,
        candidates: &Arc<CandidateSet>,
        kind: ListKind,
        options: ChatOptions,
    ) -> CollectionRequest {
        CollectionRequest {
            question: input.question.clone(),
            candidates: Arc::clone(candidates),
            kind,
            options,
            excerpt_len: input.params.excerpt_len,
            timeout: input.params.voter_timeout,
            parallelism: input.params.parallelism(candidates.len()),
        }
    }

    fn log_result(&self, input: &RunDecisionInput, result: &DecisionResult) {
        info!(label = %result.source_label, survivors = result.survivors.len(), "Decision complete");
        self.logger.log(DeliberationEvent::new(
            "result",
            serde_json::json!({
                "question": input.question,
                "protocol": input.protocol,
                "source_label": result.source_label,
                "survivors": result.survivors,
                "final_text": result.final_text,
            }),
        ));
    }
}
