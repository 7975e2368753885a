//! # CloudCore - Integrated IT Compliance Model
//!
//! Scores a SaaS billing platform against four frameworks:
//! - **ITIL 4**: incident SLA evaluation and penalties
//! - **ISO/IEC 20000**: service availability
//! - **COBIT 2019**: governance KPIs, maturity and risk register
//! - **ISO 22301**: business continuity scenarios
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloudcore::{pipeline, ModelConfig};
//! use cloudcore::report::ReportGenerator;
//!
//! let report = pipeline::run(&ModelConfig::default()).unwrap();
//! println!("{}", ReportGenerator::to_text(&report));
//! ```

pub mod availability;
pub mod continuity;
pub mod core;
pub mod domain;
pub mod fixtures;
pub mod governance;
pub mod monitoring;
pub mod pipeline;
pub mod report;
pub mod sla;

pub use core::config::ModelConfig;
pub use core::error::{Error, Result};
