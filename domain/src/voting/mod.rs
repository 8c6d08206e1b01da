//! Voting domain
//!
//! - [`irv`]: instant-runoff (ranked choice) tallying
//! - [`tally`]: per-round vote counts and the round audit trail
//! - [`verdict`]: parsing a judge's UPHOLD / OVERTURN answer

pub mod irv;
pub mod tally;
pub mod verdict;
