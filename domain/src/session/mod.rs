//! Oracle session domain.
//!
//! - [`stream::StreamEvent`]: one event of a streamed oracle reply

pub mod stream;
