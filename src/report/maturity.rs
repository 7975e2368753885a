//! Integrated maturity scoring across the four frameworks.

use crate::availability::AnnualAvailabilitySummary;
use crate::continuity::ContinuitySummary;
use crate::governance::{DashboardRecord, MaturityLevel};
use crate::sla::SLABatchSummary;
use serde::{Deserialize, Serialize};

/// One maturity criterion and whether it was met.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaturityCriterion {
    /// What is being checked
    pub description: String,
    /// Criterion met
    pub met: bool,
}

/// Integrated maturity verdict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaturityAssessment {
    /// Criteria met (0-5)
    pub score: u8,
    /// Mapped level
    pub level: MaturityLevel,
    /// Individual criteria, in evaluation order
    pub criteria: Vec<MaturityCriterion>,
}

impl MaturityAssessment {
    /// Score the evaluator summaries. Absent summaries fail their criteria.
    pub fn assess(
        sla: &SLABatchSummary,
        availability: Option<&AnnualAvailabilitySummary>,
        governance: &DashboardRecord,
        continuity: Option<&ContinuitySummary>,
    ) -> Self {
        let uptime = availability.map(|a| a.avg_annual_uptime_pct);
        let rto_pct = continuity.map(|c| c.rto_compliance_pct);

        let criteria = vec![
            MaturityCriterion {
                description: "Annual availability >= 99.9%".to_string(),
                met: uptime.map(|u| u >= 99.9).unwrap_or(false),
            },
            MaturityCriterion {
                description: "Incident SLA compliance >= 90%".to_string(),
                met: sla.compliance_rate_pct >= 90.0,
            },
            MaturityCriterion {
                description: "COBIT maturity >= level 3".to_string(),
                met: governance.maturity_level >= 3,
            },
            MaturityCriterion {
                description: "RTO compliance >= 60%".to_string(),
                met: rto_pct.map(|p| p >= 60.0).unwrap_or(false),
            },
            MaturityCriterion {
                description: "Operational SLA >= 80%".to_string(),
                met: sla.compliance_rate_pct >= 80.0,
            },
        ];

        let score = criteria.iter().filter(|c| c.met).count() as u8;
        Self {
            score,
            level: MaturityLevel::from_score(score),
            criteria,
        }
    }
}
