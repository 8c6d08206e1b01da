//! Progress notification port
//!
//! Defines the interface for reporting progress during a decision run.

/// Stage of a decision run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStage {
    /// Agents answer the question
    Generating,
    /// Agents cast ranked ballots
    Voting,
    /// Agents nominate peers for elimination
    Nominating,
    /// The judge reviews or rules
    Judging,
    /// The winning answer is summarized
    Summarizing,
}

impl DecisionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStage::Generating => "Generating",
            DecisionStage::Voting => "Voting",
            DecisionStage::Nominating => "Nominating",
            DecisionStage::Judging => "Judging",
            DecisionStage::Summarizing => "Summarizing",
        }
    }
}

impl std::fmt::Display for DecisionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback for progress updates during a decision run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinners, plain logs, etc.)
pub trait DecisionProgress: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: &DecisionStage, total_tasks: usize);

    /// Called when one agent's task completes within a stage
    fn on_task_complete(&self, stage: &DecisionStage, agent: &str, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: &DecisionStage);

    /// Called for every line appended to the deliberation log.
    fn on_log(&self, _line: &str) {}

    /// Called for each text chunk while a judge reply is streaming.
    fn on_stream_chunk(&self, _model: &str, _chunk: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DecisionProgress for NoProgress {
    fn on_stage_start(&self, _stage: &DecisionStage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: &DecisionStage, _agent: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: &DecisionStage) {}
}
