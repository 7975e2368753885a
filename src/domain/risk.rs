//! Operational risks (COBIT 2019 / ISO 31000).
//!
//! Controls are treated as independent: each removes its share of the
//! risk left by the others, so the combined effectiveness is
//! `1 - prod(1 - e_i)` and stays below 1 unless one control is perfect.

use crate::core::{ensure_range, round_to, Result};
use serde::{Deserialize, Serialize};

/// Maximum tolerable annual residual risk in USD.
pub const RISK_APPETITE_USD: f64 = 50_000.0;

/// Residual risk band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band for a residual risk amount.
    pub fn from_residual(residual_usd: f64) -> Self {
        if residual_usd < 10_000.0 {
            RiskLevel::Low
        } else if residual_usd < 30_000.0 {
            RiskLevel::Medium
        } else if residual_usd < 60_000.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// A mitigating control.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Control name
    pub name: String,
    /// Fraction of risk removed (0..=1)
    pub effectiveness: f64,
}

/// An identified operational risk.
#[derive(Clone, Debug)]
pub struct Risk {
    /// Risk ID
    pub id: String,
    /// Risk name
    pub name: String,
    /// Category (operational, cyber, ...)
    pub category: String,
    probability: f64,
    impact_usd: f64,
    controls: Vec<Control>,
}

impl Risk {
    /// Create a risk with annual `probability` in 0..=1 and a non-negative impact.
    pub fn new(id: &str, name: &str, category: &str, probability: f64, impact_usd: f64) -> Result<Self> {
        ensure_range("probability", probability, 0.0, 1.0)?;
        ensure_range("impact_usd", impact_usd, 0.0, f64::MAX)?;
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            probability,
            impact_usd,
            controls: Vec::new(),
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn impact_usd(&self) -> f64 {
        self.impact_usd
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Add a mitigating control with effectiveness in 0..=1.
    pub fn add_control(&mut self, name: &str, effectiveness: f64) -> Result<()> {
        ensure_range("effectiveness", effectiveness, 0.0, 1.0)?;
        self.controls.push(Control {
            name: name.to_string(),
            effectiveness,
        });
        Ok(())
    }

    /// Probability x impact, before controls.
    pub fn inherent_risk_usd(&self) -> f64 {
        round_to(self.probability * self.impact_usd, 2)
    }

    /// Combined effectiveness of all controls (4 decimals).
    pub fn control_effectiveness(&self) -> f64 {
        if self.controls.is_empty() {
            return 0.0;
        }
        let remaining: f64 = self
            .controls
            .iter()
            .map(|c| 1.0 - c.effectiveness)
            .product();
        round_to(1.0 - remaining, 4)
    }

    /// Inherent risk reduced by the combined control effectiveness.
    pub fn residual_risk_usd(&self) -> f64 {
        round_to(
            self.inherent_risk_usd() * (1.0 - self.control_effectiveness()),
            2,
        )
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_residual(self.residual_risk_usd())
    }

    pub fn exceeds_appetite(&self) -> bool {
        self.residual_risk_usd() > RISK_APPETITE_USD
    }

    /// Serializable view with every derived metric.
    pub fn to_record(&self) -> RiskRecord {
        RiskRecord {
            risk_id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            probability: self.probability,
            impact_usd: self.impact_usd,
            inherent_risk_usd: self.inherent_risk_usd(),
            controls: self.controls.clone(),
            control_effectiveness: self.control_effectiveness(),
            residual_risk_usd: self.residual_risk_usd(),
            risk_level: self.risk_level(),
            exceeds_appetite: self.exceeds_appetite(),
        }
    }
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Risk {} | {} | Residual: USD {:.0} | {}>",
            self.id,
            self.name,
            self.residual_risk_usd(),
            self.risk_level()
        )
    }
}

/// Flat risk record for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub risk_id: String,
    pub name: String,
    pub category: String,
    pub probability: f64,
    pub impact_usd: f64,
    pub inherent_risk_usd: f64,
    pub controls: Vec<Control>,
    pub control_effectiveness: f64,
    pub residual_risk_usd: f64,
    pub risk_level: RiskLevel,
    pub exceeds_appetite: bool,
}

impl RiskRecord {
    /// Recompute the appetite flag from the raw fields.
    pub fn derive_exceeds_appetite(&self) -> bool {
        let remaining: f64 = self.controls.iter().map(|c| 1.0 - c.effectiveness).product();
        let effectiveness = if self.controls.is_empty() {
            0.0
        } else {
            round_to(1.0 - remaining, 4)
        };
        let inherent = round_to(self.probability * self.impact_usd, 2);
        round_to(inherent * (1.0 - effectiveness), 2) > RISK_APPETITE_USD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_uncontrolled_risk() {
        let risk = Risk::new("RSK-003", "Database failure", "Infrastructure", 0.15, 60_000.0).unwrap();
        assert_eq!(risk.inherent_risk_usd(), 9000.0);
        assert_eq!(risk.control_effectiveness(), 0.0);
        assert_eq!(risk.residual_risk_usd(), 9000.0);
        assert_eq!(risk.risk_level(), RiskLevel::Low);
        assert!(!risk.exceeds_appetite());
    }

    #[test]
    fn test_single_control() {
        let mut risk = Risk::new("RSK-002", "Ransomware", "Cyber", 0.08, 295_000.0).unwrap();
        assert_eq!(risk.inherent_risk_usd(), 23_600.0);

        risk.add_control("Immutable offline backup", 0.55).unwrap();
        assert_eq!(risk.control_effectiveness(), 0.55);
        assert_eq!(risk.residual_risk_usd(), 10_620.0);
        assert_eq!(risk.risk_level(), RiskLevel::Medium);
    }

    #[test]
    fn test_controls_combine_independently() {
        let mut risk = Risk::new("RSK-1", "Outage", "Ops", 0.5, 100_000.0).unwrap();
        risk.add_control("Monitoring", 0.40).unwrap();
        assert_eq!(risk.control_effectiveness(), 0.4);

        risk.add_control("No-op", 0.0).unwrap();
        assert_eq!(risk.control_effectiveness(), 0.4);

        risk.add_control("Failover", 0.5).unwrap();
        // 1 - 0.6 * 1.0 * 0.5
        assert_eq!(risk.control_effectiveness(), 0.7);

        risk.add_control("Audit", 0.9).unwrap();
        // A naive sum would exceed 1.0 here.
        assert_eq!(risk.control_effectiveness(), 0.97);
    }

    #[test]
    fn test_risk_bands() {
        assert_eq!(RiskLevel::from_residual(9_999.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_residual(10_000.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_residual(30_000.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_residual(60_000.0), RiskLevel::Critical);
    }

    #[test]
    fn test_appetite_boundary() {
        let at = Risk::new("R", "At", "Ops", 0.5, 100_000.0).unwrap();
        assert_eq!(at.residual_risk_usd(), 50_000.0);
        assert!(!at.exceeds_appetite());

        let over = Risk::new("R", "Over", "Ops", 0.5, 100_002.0).unwrap();
        assert!(over.exceeds_appetite());
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert!(Risk::new("R", "Bad", "Ops", 1.2, 1000.0).is_err());
        assert!(Risk::new("R", "Bad", "Ops", 0.5, -1.0).is_err());

        let mut risk = Risk::new("R", "Ok", "Ops", 0.5, 1000.0).unwrap();
        assert!(risk.add_control("Too good", 1.5).is_err());
        assert!(risk.add_control("Negative", -0.1).is_err());
        assert!(risk.controls().is_empty());
    }

    #[test]
    fn test_record() {
        let mut risk = Risk::new("RSK-001", "P1/P2 outages", "Operational", 0.35, 120_000.0).unwrap();
        risk.add_control("24/7 monitoring", 0.40).unwrap();

        let record = risk.to_record();
        assert_eq!(record.inherent_risk_usd, 42_000.0);
        assert_eq!(record.residual_risk_usd, 25_200.0);
        assert_eq!(record.risk_level, RiskLevel::Medium);
        assert_eq!(record.derive_exceeds_appetite(), risk.exceeds_appetite());
    }

    proptest! {
        #[test]
        fn test_two_controls_complement_product(e1 in 0.01f64..0.99, e2 in 0.01f64..0.99) {
            let mut risk = Risk::new("R", "P", "Ops", 0.5, 100_000.0).unwrap();
            risk.add_control("a", e1).unwrap();
            risk.add_control("b", e2).unwrap();

            let combined = risk.control_effectiveness();
            let expected = round_to(1.0 - (1.0 - e1) * (1.0 - e2), 4);
            prop_assert_eq!(combined, expected);
            prop_assert!(combined >= round_to(e1.max(e2), 4));
            prop_assert!(combined < 1.0);
        }

        #[test]
        fn test_residual_never_exceeds_inherent(
            p in 0.0f64..=1.0,
            impact in 0.0f64..1_000_000.0,
            e in 0.0f64..=1.0,
        ) {
            let mut risk = Risk::new("R", "P", "Ops", p, impact).unwrap();
            risk.add_control("c", e).unwrap();
            prop_assert!(risk.residual_risk_usd() <= risk.inherent_risk_usd());
            prop_assert_eq!(risk.to_record().derive_exceeds_appetite(), risk.exceeds_appetite());
        }
    }
}
