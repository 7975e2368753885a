//! Domain Module
//!
//! Compliance entities and their derived metrics:
//! - Incidents (ITIL 4)
//! - Services and downtime (ISO/IEC 20000)
//! - Operational risks (COBIT 2019)
//! - Continuity scenarios (ISO 22301)

pub mod continuity;
pub mod incident;
pub mod risk;
pub mod service;

pub use continuity::{ContinuityScenario, DisruptionType, ScenarioRecord};
pub use incident::{Incident, IncidentRecord, IncidentStatus, Severity};
pub use risk::{Control, Risk, RiskLevel, RiskRecord, RISK_APPETITE_USD};
pub use service::{DowntimeEvent, Service, ServiceRecord, ServiceStatus};
