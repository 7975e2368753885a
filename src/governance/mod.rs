//! Governance Module
//!
//! IT governance (COBIT 2019):
//! - KPIs with polarity-aware thresholds
//! - Dashboard status, maturity and committee decisions

pub mod dashboard;
pub mod kpi;

pub use dashboard::{
    DashboardRecord, GovernanceDashboard, GovernanceStatus, MaturityLevel,
    DEFAULT_MAX_ALERTS_TOLERATED,
};
pub use kpi::{Framework, KPIRecord, KPIStatus, KPI};
