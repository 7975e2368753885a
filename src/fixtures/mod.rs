//! Fixtures Module
//!
//! Seeded synthetic data for a compliance run:
//! - Random source handle
//! - Incident, uptime, scenario, risk and KPI generators

pub mod generators;
pub mod source;

pub use generators::{
    base_time, default_scenarios, governance_kpis, monthly_uptime, risk_register,
    simulate_incidents, BILLING_SERVICE, MONTHS,
};
pub use source::{choose, choose_weighted, seeded, RandomSource};
