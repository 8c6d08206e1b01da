//! Generate Candidates use case
//!
//! Asks every configured agent the question in parallel and turns the
//! answers into a [`CandidateSet`]. Agents that fail are dropped.

use crate::ports::oracle::{ChatOptions, Oracle, OracleError};
use crate::ports::progress::{DecisionProgress, DecisionStage, NoProgress};
use conclave_domain::{Candidate, CandidateSet, DecisionPrompt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that can occur during candidate generation
#[derive(Error, Debug)]
pub enum GenerateCandidatesError {
    #[error("No agents configured")]
    NoAgents,

    #[error("All agents failed to respond")]
    AllAgentsFailed,
}

/// A named agent backed by a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub model: String,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Input for the GenerateCandidates use case
#[derive(Debug, Clone)]
pub struct GenerateCandidatesInput {
    pub question: String,
    pub agents: Vec<AgentSpec>,
    pub timeout: Option<Duration>,
}

impl GenerateCandidatesInput {
    pub fn new(question: impl Into<String>, agents: Vec<AgentSpec>) -> Self {
        Self {
            question: question.into(),
            agents,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Use case for generating the competing responses
pub struct GenerateCandidatesUseCase<O: Oracle + 'static> {
    oracle: Arc<O>,
}

impl<O: Oracle + 'static> GenerateCandidatesUseCase<O> {
    pub fn new(oracle: Arc<O>) -> Self {
        Self { oracle }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: GenerateCandidatesInput,
    ) -> Result<CandidateSet, GenerateCandidatesError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: GenerateCandidatesInput,
        progress: &dyn DecisionProgress,
    ) -> Result<CandidateSet, GenerateCandidatesError> {
        if input.agents.is_empty() {
            return Err(GenerateCandidatesError::NoAgents);
        }

        info!("Generating candidates from {} agents", input.agents.len());
        let stage = DecisionStage::Generating;
        progress.on_stage_start(&stage, input.agents.len());

        let prompt: Arc<str> = Arc::from(DecisionPrompt::initial_query(&input.question));
        let mut join_set = JoinSet::new();

        for (index, agent) in input.agents.iter().enumerate() {
            let oracle = Arc::clone(&self.oracle);
            let prompt = Arc::clone(&prompt);
            let agent = agent.clone();
            let timeout = input.timeout;

            join_set.spawn(async move {
                let options = ChatOptions::default();
                let call = oracle.chat(&agent.model, &prompt, &options);
                let result = match timeout {
                    Some(limit) => tokio::time::timeout(limit, call)
                        .await
                        .unwrap_or(Err(OracleError::Timeout)),
                    None => call.await,
                };
                (index, agent, result)
            });
        }

        let mut answered = Vec::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((index, agent, Ok(content))) => {
                    info!("Agent {} ({}) responded", agent.name, agent.model);
                    progress.on_task_complete(&stage, &agent.name, true);
                    answered.push((index, Candidate::new(agent.name, agent.model, content)));
                }
                Ok((_, agent, Err(e))) => {
                    warn!("Agent {} ({}) failed: {}", agent.name, agent.model, e);
                    progress.on_task_complete(&stage, &agent.name, false);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }
        progress.on_stage_complete(&stage);

        if answered.is_empty() {
            return Err(GenerateCandidatesError::AllAgentsFailed);
        }

        // Keep configuration order regardless of completion order
        answered.sort_by_key(|(index, _)| *index);
        let (candidates, rejected) =
            CandidateSet::dedupe(answered.into_iter().map(|(_, c)| c).collect());
        for duplicate in rejected {
            warn!("Dropping duplicate agent name '{}'", duplicate.name);
        }
        Ok(candidates)
    }
}
