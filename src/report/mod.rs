//! Report Module
//!
//! Integrated reporting across ITIL 4, ISO/IEC 20000, COBIT 2019 and ISO 22301:
//! - Five-criterion maturity score
//! - Text, JSON and CSV rendering with a SHA3-256 digest

pub mod generator;
pub mod maturity;

pub use generator::{ExportFormat, IntegratedReport, ReportGenerator, ReportInput};
pub use maturity::{MaturityAssessment, MaturityCriterion};
