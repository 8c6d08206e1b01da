//! Domain layer for conclave
//!
//! This crate contains the decision engine: ballot extraction, the
//! ranked-choice and peer-elimination state machines, judge verdict parsing
//! and the value types that flow between them. It performs no I/O and has
//! no async runtime dependency.
//!
//! # Core Concepts
//!
//! ## Candidates and Ballots
//!
//! - **Candidate**: one agent's response competing in a decision round
//! - **Ballot**: a voter's ranked preference list (at most 3 names)
//! - **Nomination list**: a voter's "who should leave first" list
//!
//! ## Protocols
//!
//! - **Aggregate**: every response is kept and concatenated
//! - **Arbiter**: a single judge decides
//! - **Ranked Choice**: instant-runoff voting among the agents
//! - **Judge & Jury**: ranked choice reviewed by a judge, with mistrials
//! - **Elimination**: iterative peer elimination to a sole survivor

pub mod ballot;
pub mod config;
pub mod core;
pub mod decision;
pub mod elimination;
pub mod prompt;
pub mod session;
pub mod voting;

// Re-export commonly used types
pub use ballot::{
    BALLOT_DEPTH, Ballot, Extraction, ListDepth, NominationList, extract_name_list,
    extract_nominations, render_name_list,
};
pub use config::OutputFormat;
pub use core::{
    candidate::{Candidate, CandidateSet},
    error::DomainError,
};
pub use decision::{
    context::DecisionContext,
    protocol::DecisionProtocol,
    result::{DecisionResult, labels},
};
pub use elimination::{
    skin::{EliminationSkin, Narrator, SkinLabels},
    tournament::{EliminationOutcome, Terminal, run_elimination},
};
pub use prompt::DecisionPrompt;
pub use session::stream::StreamEvent;
pub use voting::{
    irv::{IrvOutcome, IrvWinner, run_irv},
    tally::{RoundRecord, Tally},
    verdict::{Verdict, parse_verdict},
};
