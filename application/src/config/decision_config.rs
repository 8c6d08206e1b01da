//! Decision configuration
//!
//! [`DecisionConfig`] is what the outer layers hand over to run a decision:
//! which protocol, which judge, and the tuning parameters.

use super::DecisionParams;
use crate::use_cases::run_decision::RunDecisionInput;
use conclave_domain::{CandidateSet, DecisionProtocol};

#[derive(Debug, Clone, Default)]
pub struct DecisionConfig {
    pub protocol: DecisionProtocol,
    /// Model used as judge; blank values count as no judge
    pub judge_model: Option<String>,
    pub params: DecisionParams,
}

impl DecisionConfig {
    pub fn new(protocol: DecisionProtocol) -> Self {
        Self {
            protocol,
            ..Default::default()
        }
    }

    pub fn with_judge(mut self, judge: Option<String>) -> Self {
        self.judge_model = judge.filter(|j| !j.trim().is_empty());
        self
    }

    pub fn with_params(mut self, params: DecisionParams) -> Self {
        self.params = params;
        self
    }

    /// Build the use case input for one question
    pub fn to_input(&self, question: impl Into<String>, candidates: CandidateSet) -> RunDecisionInput {
        RunDecisionInput {
            question: question.into(),
            candidates,
            protocol: self.protocol,
            judge_model: self.judge_model.clone(),
            params: self.params.clone(),
        }
    }
}
