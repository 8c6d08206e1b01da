//! Collect Ballots use case
//!
//! Asks every voter for its name list in parallel. Each call runs on a
//! `JoinSet` task, holds a semaphore permit and is bounded by the voter
//! timeout. Any failure (oracle error, timeout, panic, unparseable reply)
//! leaves that voter with an empty list.

use crate::ports::oracle::{ChatOptions, Oracle, OracleError};
use crate::ports::progress::{DecisionProgress, DecisionStage};
use conclave_domain::{
    CandidateSet, DecisionPrompt, EliminationSkin, Extraction, ListDepth, extract_name_list,
    extract_nominations,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// What voters are asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Top-3 ranked ballot, self-votes allowed
    Ballot,
    /// Unbounded "remove first" list, never naming the nominator
    Nomination(EliminationSkin),
}

impl ListKind {
    fn stage(&self) -> DecisionStage {
        match self {
            ListKind::Ballot => DecisionStage::Voting,
            ListKind::Nomination(_) => DecisionStage::Nominating,
        }
    }
}

/// What one voter produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoterOutcome {
    /// A parsed list (possibly empty)
    Cast(Vec<String>),
    /// The reply held no usable list
    Malformed,
    /// The call failed, timed out or panicked
    Failed(String),
}

impl VoterOutcome {
    pub fn names(&self) -> &[String] {
        match self {
            VoterOutcome::Cast(names) => names,
            VoterOutcome::Malformed | VoterOutcome::Failed(_) => &[],
        }
    }

    pub fn is_disenfranchised(&self) -> bool {
        !matches!(self, VoterOutcome::Cast(_))
    }
}

/// Input for one collection pass
#[derive(Debug, Clone)]
pub struct CollectionRequest {
    pub question: String,
    pub candidates: Arc<CandidateSet>,
    pub kind: ListKind,
    pub options: ChatOptions,
    pub excerpt_len: usize,
    pub timeout: Option<Duration>,
    /// Concurrent calls allowed
    pub parallelism: usize,
}

/// Per-voter results, keyed by voter name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedLists {
    pub outcomes: BTreeMap<String, VoterOutcome>,
}

impl CollectedLists {
    /// Every voter's list, empty for disenfranchised voters
    pub fn lists(&self) -> BTreeMap<String, Vec<String>> {
        self.outcomes
            .iter()
            .map(|(voter, outcome)| (voter.clone(), outcome.names().to_vec()))
            .collect()
    }

    /// Ballots in voter-name order
    pub fn ballots(&self) -> Vec<Vec<String>> {
        self.outcomes
            .values()
            .map(|outcome| outcome.names().to_vec())
            .collect()
    }

    pub fn disenfranchised(&self) -> impl Iterator<Item = (&str, &VoterOutcome)> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_disenfranchised())
            .map(|(voter, outcome)| (voter.as_str(), outcome))
    }
}

/// Use case for collecting ballots or nomination lists
pub struct CollectBallotsUseCase<O: Oracle + 'static> {
    oracle: Arc<O>,
}

impl<O: Oracle + 'static> CollectBallotsUseCase<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    pub async fn execute(
        &self,
        request: CollectionRequest,
        progress: &dyn DecisionProgress,
    ) -> CollectedLists {
        let stage = request.kind.stage();
        let voters = request.candidates.len();
        info!(
            "Collecting {} lists from {} voters",
            stage.as_str().to_lowercase(),
            voters
        );
        progress.on_stage_start(&stage, voters);

        let semaphore = Arc::new(Semaphore::new(request.parallelism.max(1)));
        let question: Arc<str> = Arc::from(request.question.as_str());
        let mut join_set = JoinSet::new();

        for voter in request.candidates.iter() {
            let oracle = Arc::clone(&self.oracle);
            let semaphore = Arc::clone(&semaphore);
            let candidates = Arc::clone(&request.candidates);
            let question = Arc::clone(&question);
            let voter_name = voter.name.clone();
            let model = voter.model_tag.clone();
            let kind = request.kind;
            let options = request.options;
            let excerpt_len = request.excerpt_len;
            let timeout = request.timeout;

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = Self::collect_one(
                    oracle.as_ref(),
                    &model,
                    &voter_name,
                    &question,
                    &candidates,
                    kind,
                    &options,
                    excerpt_len,
                    timeout,
                )
                .await;
                (voter_name, outcome)
            });
        }

        let mut outcomes = BTreeMap::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((voter, outcome)) => {
                    match &outcome {
                        VoterOutcome::Cast(names) => {
                            debug!(voter = %voter, list = ?names, "List received");
                        }
                        VoterOutcome::Malformed => {
                            warn!(voter = %voter, "Reply held no usable list");
                        }
                        VoterOutcome::Failed(reason) => {
                            warn!(voter = %voter, "Voter call failed: {}", reason);
                        }
                    }
                    progress.on_task_complete(&stage, &voter, !outcome.is_disenfranchised());
                    outcomes.insert(voter, outcome);
                }
                Err(e) => {
                    warn!("Voter task join error: {}", e);
                }
            }
        }

        // Voters whose task panicked never reported back
        for name in request.candidates.names() {
            if !outcomes.contains_key(&name) {
                progress.on_task_complete(&stage, &name, false);
                outcomes.insert(name, VoterOutcome::Failed("voter task aborted".to_string()));
            }
        }

        progress.on_stage_complete(&stage);
        CollectedLists { outcomes }
    }

    #[allow(clippy::too_many_arguments)]
    async fn collect_one(
        oracle: &O,
        model: &str,
        voter: &str,
        question: &str,
        candidates: &CandidateSet,
        kind: ListKind,
        options: &ChatOptions,
        excerpt_len: usize,
        timeout: Option<Duration>,
    ) -> VoterOutcome {
        let prompt = match kind {
            ListKind::Ballot => DecisionPrompt::ballot(question, voter, candidates, excerpt_len),
            ListKind::Nomination(skin) => {
                DecisionPrompt::nomination(skin, question, voter, candidates, excerpt_len)
            }
        };

        let call = oracle.chat(model, &prompt, options);
        let reply = match timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(OracleError::Timeout)),
            None => call.await,
        };

        let raw = match reply {
            Ok(raw) => raw,
            Err(e) => return VoterOutcome::Failed(e.to_string()),
        };

        let names = candidates.names();
        let extraction = match kind {
            ListKind::Ballot => extract_name_list(&raw, &names, ListDepth::Ranking),
            ListKind::Nomination(_) => extract_nominations(&raw, &names, voter),
        };

        match extraction {
            Extraction::Parsed(list) => VoterOutcome::Cast(list),
            Extraction::Failed => VoterOutcome::Malformed,
        }
    }
}
