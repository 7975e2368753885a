//! SLA Module
//!
//! Provides incident Service Level Agreement tracking:
//! - Incident registry
//! - Per-incident and batch SLA evaluation
//! - Per-severity breakdowns

pub mod evaluator;
pub mod registry;

pub use evaluator::{
    EvaluationRecord, SLABatchSummary, SLAEvaluator, SLAStatus, SLAVerdict, SeverityBreakdown,
};
pub use registry::IncidentRegistry;
