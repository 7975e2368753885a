//! Recovery simulation against RTO/RPO objectives (ISO 22301).

use crate::core::round_to;
use crate::domain::{ContinuityScenario, ScenarioRecord};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default RTO ceiling (hours).
pub const DEFAULT_RTO_HOURS: f64 = 4.0;

/// Verdict of a single recovery check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryVerdict {
    WithinRto,
    RtoBreached,
}

impl std::fmt::Display for RecoveryVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoveryVerdict::WithinRto => write!(f, "Recovery within RTO"),
            RecoveryVerdict::RtoBreached => write!(f, "RTO breached"),
        }
    }
}

/// Continuity roll-up across scenarios.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContinuitySummary {
    pub total_scenarios: usize,
    pub rto_compliant: usize,
    pub rto_compliance_pct: f64,
    pub rpo_compliant: usize,
    pub rpo_compliance_pct: f64,
    pub total_financial_impact_usd: f64,
    pub total_residual_risk_usd: f64,
    /// Scenarios failing their RTO
    pub critical_scenarios: Vec<String>,
}

/// Recovery simulator.
pub struct RecoverySimulator {
    /// RTO ceiling for quick checks (hours)
    rto_hours: f64,
    /// Scenarios, in registration order
    scenarios: Vec<ContinuityScenario>,
}

impl RecoverySimulator {
    /// Create a simulator. A minutes ceiling takes precedence over hours;
    /// with neither, the ceiling is four hours.
    pub fn new(rto_minutes: Option<f64>, rto_hours: Option<f64>) -> Self {
        let rto_hours = match (rto_minutes, rto_hours) {
            (Some(minutes), _) => minutes / 60.0,
            (None, Some(hours)) => hours,
            (None, None) => DEFAULT_RTO_HOURS,
        };
        Self {
            rto_hours,
            scenarios: Vec::new(),
        }
    }

    pub fn from_minutes(minutes: f64) -> Self {
        Self::new(Some(minutes), None)
    }

    pub fn from_hours(hours: f64) -> Self {
        Self::new(None, Some(hours))
    }

    pub fn rto_hours(&self) -> f64 {
        self.rto_hours
    }

    /// Compare a measured recovery (minutes) with the ceiling.
    pub fn simulate_recovery(&self, actual_minutes: f64) -> RecoveryVerdict {
        if actual_minutes <= self.rto_hours * 60.0 {
            RecoveryVerdict::WithinRto
        } else {
            RecoveryVerdict::RtoBreached
        }
    }

    pub fn add_scenario(&mut self, scenario: ContinuityScenario) {
        self.scenarios.push(scenario);
    }

    pub fn scenarios(&self) -> &[ContinuityScenario] {
        &self.scenarios
    }

    /// Evaluate every scenario.
    pub fn run_all(&self) -> Vec<ScenarioRecord> {
        self.scenarios
            .iter()
            .map(|s| {
                let record = s.to_record();
                warn!(
                    scenario = %record.scenario_id,
                    disruption = %record.disruption_type,
                    actual_rto_h = ?record.actual_rto_h,
                    meets_rto = record.meets_rto,
                    rto_gap_h = ?record.rto_gap_h,
                    impact_usd = ?record.financial_impact_usd,
                    "Continuity scenario"
                );
                record
            })
            .collect()
    }

    /// Roll the scenarios up. `None` when no scenario was added.
    pub fn continuity_summary(&self) -> Option<ContinuitySummary> {
        if self.scenarios.is_empty() {
            return None;
        }

        let total = self.scenarios.len();
        let rto_compliant = self.scenarios.iter().filter(|s| s.meets_rto()).count();
        let rpo_compliant = self.scenarios.iter().filter(|s| s.meets_rpo()).count();
        let total_impact: f64 = self
            .scenarios
            .iter()
            .filter_map(|s| s.financial_impact_usd())
            .sum();
        let total_risk: f64 = self
            .scenarios
            .iter()
            .filter_map(|s| s.residual_risk_usd())
            .sum();

        Some(ContinuitySummary {
            total_scenarios: total,
            rto_compliant,
            rto_compliance_pct: round_to(rto_compliant as f64 / total as f64 * 100.0, 1),
            rpo_compliant,
            rpo_compliance_pct: round_to(rpo_compliant as f64 / total as f64 * 100.0, 1),
            total_financial_impact_usd: round_to(total_impact, 2),
            total_residual_risk_usd: round_to(total_risk, 2),
            critical_scenarios: self
                .scenarios
                .iter()
                .filter(|s| !s.meets_rto())
                .map(|s| s.id.clone())
                .collect(),
        })
    }
}

impl Default for RecoverySimulator {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisruptionType;

    fn scenario(id: &str, rto: Option<f64>, rpo: f64) -> ContinuityScenario {
        let mut s = ContinuityScenario::new(id, DisruptionType::CloudOutage, 0.2, 4.0, 0.25, 100).unwrap();
        if let Some(rto) = rto {
            s.simulate(rto, rpo);
        }
        s
    }

    #[test]
    fn test_ceiling_precedence() {
        assert_eq!(RecoverySimulator::default().rto_hours(), 4.0);
        assert_eq!(RecoverySimulator::from_hours(2.0).rto_hours(), 2.0);
        assert_eq!(RecoverySimulator::new(Some(90.0), Some(8.0)).rto_hours(), 1.5);
    }

    #[test]
    fn test_simulate_recovery() {
        let simulator = RecoverySimulator::from_minutes(60.0);
        assert_eq!(simulator.simulate_recovery(45.0), RecoveryVerdict::WithinRto);
        assert_eq!(simulator.simulate_recovery(60.0), RecoveryVerdict::WithinRto);
        assert_eq!(simulator.simulate_recovery(90.0), RecoveryVerdict::RtoBreached);
    }

    #[test]
    fn test_empty_summary_is_absent() {
        let simulator = RecoverySimulator::default();
        assert!(simulator.continuity_summary().is_none());
        assert!(simulator.run_all().is_empty());
    }

    #[test]
    fn test_summary() {
        let mut simulator = RecoverySimulator::default();
        simulator.add_scenario(scenario("ESC-1", Some(2.0), 0.1));
        simulator.add_scenario(scenario("ESC-2", Some(6.0), 0.5));
        simulator.add_scenario(scenario("ESC-3", None, 0.0));

        let results = simulator.run_all();
        assert_eq!(results.len(), 3);
        assert!(results[0].meets_rto);

        let summary = simulator.continuity_summary().unwrap();
        assert_eq!(summary.total_scenarios, 3);
        assert_eq!(summary.rto_compliant, 1);
        assert_eq!(summary.rto_compliance_pct, 33.3);
        assert_eq!(summary.rpo_compliant, 1);
        assert_eq!(summary.total_financial_impact_usd, 120_000.0);
        assert_eq!(summary.total_residual_risk_usd, 24_000.0);
        assert_eq!(summary.critical_scenarios, vec!["ESC-2", "ESC-3"]);
    }
}
