//! Peer-elimination tournaments
//!
//! Every agent nominates the peers it would remove first. Each round the
//! most-nominated candidate leaves; ties at the top leave together. The
//! tournament ends with a sole survivor or with nobody left.
//!
//! The same state machine runs under two skins, an adversarial
//! "Fight to the Death" and an honorific "Retirement Lounge". A skin only
//! changes the words in the log.

pub mod skin;
pub mod tournament;
