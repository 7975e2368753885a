//! Continuity Module
//!
//! Business continuity (ISO 22301):
//! - Quick RTO checks
//! - Scenario runs and continuity roll-up

pub mod simulator;

pub use simulator::{ContinuitySummary, RecoverySimulator, RecoveryVerdict, DEFAULT_RTO_HOURS};
