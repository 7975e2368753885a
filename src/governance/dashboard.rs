//! Governance dashboard (COBIT 2019, EDM domain).
//!
//! Rolls the period's KPIs into an alert count, a governance status, a
//! 0-5 maturity level and the committee's action list.

use crate::governance::kpi::{KPIRecord, KPIStatus, KPI};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default number of alerts tolerated before non-compliance.
pub const DEFAULT_MAX_ALERTS_TOLERATED: usize = 1;

/// Capability maturity level (0-5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaturityLevel {
    NonExistent = 0,
    Initial = 1,
    Managed = 2,
    Defined = 3,
    QuantitativelyManaged = 4,
    Optimized = 5,
}

impl MaturityLevel {
    /// Level for a 0-5 score; scores above 5 saturate.
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => MaturityLevel::NonExistent,
            1 => MaturityLevel::Initial,
            2 => MaturityLevel::Managed,
            3 => MaturityLevel::Defined,
            4 => MaturityLevel::QuantitativelyManaged,
            _ => MaturityLevel::Optimized,
        }
    }

    pub fn score(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MaturityLevel::NonExistent => "Non-existent",
            MaturityLevel::Initial => "Initial",
            MaturityLevel::Managed => "Managed",
            MaturityLevel::Defined => "Defined",
            MaturityLevel::QuantitativelyManaged => "Quantitatively Managed",
            MaturityLevel::Optimized => "Optimized",
        }
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/5 - {}", self.score(), self.label())
    }
}

/// Overall governance status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceStatus {
    Compliant,
    Observation,
    NonCompliant,
}

impl std::fmt::Display for GovernanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GovernanceStatus::Compliant => write!(f, "Compliant"),
            GovernanceStatus::Observation => write!(f, "Observation"),
            GovernanceStatus::NonCompliant => write!(f, "Non-compliant"),
        }
    }
}

/// Serializable dashboard snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecord {
    pub period: String,
    pub kpis: Vec<KPIRecord>,
    pub alerts_count: usize,
    pub governance_status: GovernanceStatus,
    pub maturity_level: u8,
    pub maturity_desc: String,
    pub committee_decisions: Vec<String>,
}

/// Governance dashboard for one period.
pub struct GovernanceDashboard {
    /// Period label
    period: String,
    /// Alerts tolerated before non-compliance
    max_alerts_tolerated: usize,
    /// Indicators, in registration order
    kpis: Vec<KPI>,
}

impl GovernanceDashboard {
    /// Create an empty dashboard.
    pub fn new(period: &str) -> Self {
        Self {
            period: period.to_string(),
            max_alerts_tolerated: DEFAULT_MAX_ALERTS_TOLERATED,
            kpis: Vec::new(),
        }
    }

    /// Set the alert tolerance.
    pub fn with_tolerance(mut self, max_alerts: usize) -> Self {
        self.max_alerts_tolerated = max_alerts;
        self
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    /// Add an indicator.
    pub fn add_kpi(&mut self, kpi: KPI) {
        info!(
            kpi = %kpi.name,
            value = kpi.value,
            unit = %kpi.unit,
            status = %kpi.status(),
            "KPI added"
        );
        self.kpis.push(kpi);
    }

    pub fn kpis(&self) -> &[KPI] {
        &self.kpis
    }

    /// Indicators currently in alert.
    pub fn alerts(&self) -> Vec<&KPI> {
        self.kpis.iter().filter(|k| k.is_alert()).collect()
    }

    pub fn governance_status(&self) -> GovernanceStatus {
        let n_alerts = self.alerts().len();
        if n_alerts == 0 {
            GovernanceStatus::Compliant
        } else if n_alerts <= self.max_alerts_tolerated {
            GovernanceStatus::Observation
        } else {
            GovernanceStatus::NonCompliant
        }
    }

    /// Maturity from the share of indicators in OK.
    pub fn maturity_level(&self) -> MaturityLevel {
        if self.kpis.is_empty() {
            return MaturityLevel::NonExistent;
        }
        let ok = self
            .kpis
            .iter()
            .filter(|k| k.status() == KPIStatus::Ok)
            .count();
        // Ties go to the even level: 2 of 4 OK scores 2, not 3.
        let score = (ok as f64 / self.kpis.len() as f64 * 5.0).round_ties_even() as u8;
        MaturityLevel::from_score(score)
    }

    /// One corrective action per alert, or a single "no action" line.
    pub fn committee_decision(&self) -> Vec<String> {
        let decisions: Vec<String> = self
            .alerts()
            .iter()
            .map(|kpi| {
                format!(
                    "ACTION REQUIRED: '{}' in ALERT (value {:.2} vs threshold {:.2}). \
                     Assign an owner and a remediation deadline.",
                    kpi.name, kpi.value, kpi.threshold
                )
            })
            .collect();

        if decisions.is_empty() {
            vec!["No corrective actions pending. Maintain current controls.".to_string()]
        } else {
            decisions
        }
    }

    /// Fixed-width summary panel.
    pub fn summary_text(&self) -> String {
        let rule = "=".repeat(55);
        let mut output = String::new();

        output.push_str(&format!("{}\n", rule));
        output.push_str(&format!("  COBIT 2019 DASHBOARD - CloudCore SaaS | {}\n", self.period));
        output.push_str(&format!("{}\n", rule));
        for kpi in &self.kpis {
            let icon = if kpi.is_alert() { "✗" } else { "✓" };
            output.push_str(&format!(
                "  {} {:<35} {:>7.2}{}  [{}]\n",
                icon,
                kpi.name,
                kpi.value,
                kpi.unit,
                kpi.status()
            ));
        }
        output.push_str(&format!("{}\n", rule));
        output.push_str(&format!("  Maturity level: {}\n", self.maturity_level()));
        output.push_str(&format!("  Governance status: {}\n", self.governance_status()));
        output.push_str(&format!("{}\n", rule));

        output
    }

    pub fn to_record(&self) -> DashboardRecord {
        let maturity = self.maturity_level();
        DashboardRecord {
            period: self.period.clone(),
            kpis: self.kpis.iter().map(|k| k.to_record()).collect(),
            alerts_count: self.alerts().len(),
            governance_status: self.governance_status(),
            maturity_level: maturity.score(),
            maturity_desc: maturity.label().to_string(),
            committee_decisions: self.committee_decision(),
        }
    }
}
