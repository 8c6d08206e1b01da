//! Ballots and nomination lists
//!
//! Voters answer in free text. These functions recover the ordered list of
//! candidate names buried in that text. They are pure domain logic: no I/O,
//! just pattern matching against the canonical roster.
//!
//! | Function | Use Case | Depth |
//! |----------|----------|-------|
//! | [`extract_name_list`] | Ranked ballots | 3 |
//! | [`extract_nominations`] | Elimination "who should leave" lists | unbounded, nominator removed |

mod extraction;

pub use extraction::{
    BALLOT_DEPTH, Extraction, ListDepth, extract_name_list, extract_nominations, render_name_list,
};

/// Ranked preference list of canonical names, at most [`BALLOT_DEPTH`] long.
///
/// An empty ballot means the voter was disenfranchised.
pub type Ballot = Vec<String>;

/// Ordered "remove first" list of canonical names, never containing the
/// nominator.
pub type NominationList = Vec<String>;
