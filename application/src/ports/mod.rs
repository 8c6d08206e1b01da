//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod deliberation_logger;
pub mod oracle;
pub mod progress;
