//! Business continuity scenarios (ISO 22301).

use crate::core::{ensure_range, round_to, Result};
use serde::{Deserialize, Serialize};

/// Financial impact of one hour of disruption in USD.
pub const DISRUPTION_COST_PER_HOUR_USD: f64 = 15_000.0;

/// Kind of disruption a scenario models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisruptionType {
    DatabaseFailure,
    Ransomware,
    CloudOutage,
    NetworkLoss,
    DeployFailure,
}

impl DisruptionType {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            DisruptionType::DatabaseFailure => "Total Database Failure",
            DisruptionType::Ransomware => "Ransomware Attack",
            DisruptionType::CloudOutage => "Cloud Infrastructure Outage",
            DisruptionType::NetworkLoss => "Network Connectivity Loss",
            DisruptionType::DeployFailure => "Critical Deployment Failure",
        }
    }
}

impl std::fmt::Display for DisruptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Measured recovery of a simulated scenario.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    /// Actual recovery time (hours)
    pub rto_h: f64,
    /// Actual data-loss window (hours)
    pub rpo_h: f64,
}

/// A disruption scenario with recovery objectives.
#[derive(Clone, Debug)]
pub struct ContinuityScenario {
    /// Scenario ID
    pub id: String,
    /// Disruption type
    pub disruption_type: DisruptionType,
    /// Annual probability of occurrence
    pub probability: f64,
    /// Recovery Time Objective (hours)
    pub rto_objective_h: f64,
    /// Recovery Point Objective (hours)
    pub rpo_objective_h: f64,
    /// Clients affected by the disruption
    pub clients_affected: u32,
    outcome: Option<RecoveryOutcome>,
}

impl ContinuityScenario {
    /// Create a scenario that has not been simulated yet.
    pub fn new(
        id: &str,
        disruption_type: DisruptionType,
        probability: f64,
        rto_objective_h: f64,
        rpo_objective_h: f64,
        clients_affected: u32,
    ) -> Result<Self> {
        ensure_range("probability", probability, 0.0, 1.0)?;
        Ok(Self {
            id: id.to_string(),
            disruption_type,
            probability,
            rto_objective_h,
            rpo_objective_h,
            clients_affected,
            outcome: None,
        })
    }

    /// Record the measured recovery times.
    pub fn simulate(&mut self, actual_rto_h: f64, actual_rpo_h: f64) {
        self.outcome = Some(RecoveryOutcome {
            rto_h: actual_rto_h,
            rpo_h: actual_rpo_h,
        });
    }

    pub fn outcome(&self) -> Option<RecoveryOutcome> {
        self.outcome
    }

    pub fn actual_rto_h(&self) -> Option<f64> {
        self.outcome.map(|o| o.rto_h)
    }

    pub fn actual_rpo_h(&self) -> Option<f64> {
        self.outcome.map(|o| o.rpo_h)
    }

    pub fn meets_rto(&self) -> bool {
        self.actual_rto_h()
            .map(|rto| rto <= self.rto_objective_h)
            .unwrap_or(false)
    }

    pub fn meets_rpo(&self) -> bool {
        self.actual_rpo_h()
            .map(|rpo| rpo <= self.rpo_objective_h)
            .unwrap_or(false)
    }

    /// Hours beyond the RTO objective.
    pub fn rto_gap_h(&self) -> Option<f64> {
        self.actual_rto_h()
            .map(|rto| round_to((rto - self.rto_objective_h).max(0.0), 2))
    }

    /// Cost of the measured outage.
    pub fn financial_impact_usd(&self) -> Option<f64> {
        self.actual_rto_h()
            .map(|rto| round_to(rto * DISRUPTION_COST_PER_HOUR_USD, 2))
    }

    /// Annualised residual risk: probability x impact.
    pub fn residual_risk_usd(&self) -> Option<f64> {
        self.financial_impact_usd()
            .map(|impact| round_to(self.probability * impact, 2))
    }

    /// Serializable view with every derived metric.
    pub fn to_record(&self) -> ScenarioRecord {
        ScenarioRecord {
            scenario_id: self.id.clone(),
            disruption_type: self.disruption_type,
            probability: self.probability,
            rto_objective_h: self.rto_objective_h,
            rpo_objective_h: self.rpo_objective_h,
            actual_rto_h: self.actual_rto_h(),
            actual_rpo_h: self.actual_rpo_h(),
            meets_rto: self.meets_rto(),
            meets_rpo: self.meets_rpo(),
            rto_gap_h: self.rto_gap_h(),
            clients_affected: self.clients_affected,
            financial_impact_usd: self.financial_impact_usd(),
            residual_risk_usd: self.residual_risk_usd(),
        }
    }
}

impl std::fmt::Display for ContinuityScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.meets_rto(), self.rto_gap_h()) {
            (true, _) => write!(f, "<Scenario {} | {} | ✓ RTO OK>", self.id, self.disruption_type),
            (false, Some(gap)) => write!(
                f,
                "<Scenario {} | {} | ✗ RTO +{:.1}h>",
                self.id, self.disruption_type, gap
            ),
            (false, None) => write!(f, "<Scenario {} | {} | not simulated>", self.id, self.disruption_type),
        }
    }
}

/// Flat scenario record for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub scenario_id: String,
    pub disruption_type: DisruptionType,
    pub probability: f64,
    pub rto_objective_h: f64,
    pub rpo_objective_h: f64,
    pub actual_rto_h: Option<f64>,
    pub actual_rpo_h: Option<f64>,
    pub meets_rto: bool,
    pub meets_rpo: bool,
    pub rto_gap_h: Option<f64>,
    pub clients_affected: u32,
    pub financial_impact_usd: Option<f64>,
    pub residual_risk_usd: Option<f64>,
}

impl ScenarioRecord {
    /// Recompute (RTO, RPO) compliance from the raw fields.
    pub fn derive_compliance(&self) -> (bool, bool) {
        let rto = self
            .actual_rto_h
            .map(|v| v <= self.rto_objective_h)
            .unwrap_or(false);
        let rpo = self
            .actual_rpo_h
            .map(|v| v <= self.rpo_objective_h)
            .unwrap_or(false);
        (rto, rpo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ContinuityScenario {
        ContinuityScenario::new("ESC-001", DisruptionType::DatabaseFailure, 0.15, 4.0, 0.25, 3000)
            .unwrap()
    }

    #[test]
    fn test_unsimulated_scenario() {
        let s = scenario();
        assert!(!s.meets_rto());
        assert!(!s.meets_rpo());
        assert_eq!(s.rto_gap_h(), None);
        assert_eq!(s.financial_impact_usd(), None);
        assert_eq!(s.residual_risk_usd(), None);
        assert!(s.to_string().contains("not simulated"));
    }

    #[test]
    fn test_within_objectives() {
        let mut s = scenario();
        s.simulate(4.0, 0.25);
        assert!(s.meets_rto());
        assert!(s.meets_rpo());
        assert_eq!(s.rto_gap_h(), Some(0.0));
        assert_eq!(s.financial_impact_usd(), Some(60_000.0));
        assert_eq!(s.residual_risk_usd(), Some(9_000.0));
    }

    #[test]
    fn test_rto_breach() {
        let mut s = scenario();
        s.simulate(6.5, 0.1);
        assert!(!s.meets_rto());
        assert!(s.meets_rpo());
        assert_eq!(s.rto_gap_h(), Some(2.5));
        assert_eq!(s.financial_impact_usd(), Some(97_500.0));
        assert!(s.to_string().contains("+2.5h"));
    }

    #[test]
    fn test_invalid_probability() {
        assert!(ContinuityScenario::new("X", DisruptionType::Ransomware, -0.1, 4.0, 0.25, 1).is_err());
    }

    #[test]
    fn test_record_rederives_flags() {
        let mut s = scenario();
        assert_eq!(s.to_record().derive_compliance(), (false, false));

        s.simulate(5.0, 0.2);
        let record = s.to_record();
        assert_eq!(record.derive_compliance(), (s.meets_rto(), s.meets_rpo()));
        assert_eq!(record.rto_gap_h, Some(1.0));
    }
}
