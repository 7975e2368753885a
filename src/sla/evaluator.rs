//! SLA evaluation of incident resolution times.
//!
//! Scores single incidents, batches, and per-severity breakdowns.

use crate::core::round_to;
use crate::domain::{Incident, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Default batch compliance target (%).
pub const DEFAULT_SLA_TARGET_PCT: f64 = 95.0;

/// Verdict for a single incident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SLAVerdict {
    /// Not resolved yet
    Pending,
    /// Resolved within the ceiling
    Meets,
    /// Resolved after the ceiling
    Breaches,
}

impl std::fmt::Display for SLAVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SLAVerdict::Pending => write!(f, "Pending"),
            SLAVerdict::Meets => write!(f, "Meets SLA"),
            SLAVerdict::Breaches => write!(f, "Breaches SLA"),
        }
    }
}

/// Overall SLA status of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SLAStatus {
    Compliant,
    NonCompliant,
}

impl std::fmt::Display for SLAStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SLAStatus::Compliant => write!(f, "Compliant"),
            SLAStatus::NonCompliant => write!(f, "Non-compliant"),
        }
    }
}

/// One evaluated incident.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Incident ID
    pub incident_id: String,
    /// Severity
    pub severity: Severity,
    /// Verdict
    pub verdict: SLAVerdict,
    /// Penalty owed (USD)
    pub penalty_usd: f64,
}

/// Summary of a batch evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SLABatchSummary {
    /// Incidents evaluated
    pub total_incidents: usize,
    /// Incidents within SLA
    pub compliant: usize,
    /// Incidents breaching or pending
    pub non_compliant: usize,
    /// compliant / total x 100 (0 when empty)
    pub compliance_rate_pct: f64,
    /// Sum of penalties (USD)
    pub total_penalty_usd: f64,
    /// Overall status
    pub sla_status: SLAStatus,
}

/// Compliance figures for one severity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub total: usize,
    pub compliant: usize,
    pub pct: f64,
    pub penalty_usd: f64,
    /// Mean resolution time over the whole group (hours)
    pub avg_time_h: f64,
}

/// SLA evaluator.
pub struct SLAEvaluator {
    /// Batch compliance target (%)
    target_pct: f64,
    /// Evaluations performed, in order
    evaluations: Vec<EvaluationRecord>,
}

impl SLAEvaluator {
    /// Create an evaluator with the default 95% target.
    pub fn new() -> Self {
        Self::with_target(DEFAULT_SLA_TARGET_PCT)
    }

    /// Create an evaluator with a custom batch target.
    pub fn with_target(target_pct: f64) -> Self {
        Self {
            target_pct,
            evaluations: Vec::new(),
        }
    }

    /// Evaluate one incident and record the result.
    pub fn evaluate(&mut self, incident: &Incident) -> SLAVerdict {
        let verdict = match incident.resolution_hours() {
            None => SLAVerdict::Pending,
            Some(t) => {
                let verdict = if incident.meets_sla() {
                    SLAVerdict::Meets
                } else {
                    SLAVerdict::Breaches
                };
                info!(
                    incident = %incident.id,
                    severity = %incident.severity,
                    hours = round_to(t, 2),
                    limit = incident.sla_limit_hours(),
                    "{}",
                    verdict
                );
                verdict
            }
        };

        self.evaluations.push(EvaluationRecord {
            incident_id: incident.id.clone(),
            severity: incident.severity,
            verdict,
            penalty_usd: incident.penalty_usd(),
        });

        verdict
    }

    /// Evaluate a batch and summarise it.
    pub fn evaluate_batch(&mut self, incidents: &[Incident]) -> SLABatchSummary {
        for incident in incidents {
            self.evaluate(incident);
        }

        let total = incidents.len();
        let compliant = incidents.iter().filter(|i| i.meets_sla()).count();
        let total_penalty: f64 = incidents.iter().map(|i| i.penalty_usd()).sum();
        let raw_rate = if total > 0 {
            compliant as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let rate = round_to(raw_rate, 2);

        let summary = SLABatchSummary {
            total_incidents: total,
            compliant,
            non_compliant: total - compliant,
            compliance_rate_pct: rate,
            total_penalty_usd: round_to(total_penalty, 2),
            // Status uses the unrounded rate
            sla_status: if total > 0 && raw_rate >= self.target_pct {
                SLAStatus::Compliant
            } else {
                SLAStatus::NonCompliant
            },
        };

        warn!(
            compliance_pct = summary.compliance_rate_pct,
            penalty_usd = summary.total_penalty_usd,
            "SLA batch evaluated"
        );
        summary
    }

    /// Break compliance down by severity, most urgent first.
    pub fn compliance_by_severity(&self, incidents: &[Incident]) -> BTreeMap<Severity, SeverityBreakdown> {
        let mut groups: BTreeMap<Severity, Vec<&Incident>> = BTreeMap::new();
        for incident in incidents {
            groups.entry(incident.severity).or_default().push(incident);
        }

        groups
            .into_iter()
            .map(|(severity, group)| {
                let total = group.len();
                let compliant = group.iter().filter(|i| i.meets_sla()).count();
                let total_time: f64 = group.iter().filter_map(|i| i.resolution_hours()).sum();
                let (pct, avg_time_h) = if total > 0 {
                    (
                        round_to(compliant as f64 / total as f64 * 100.0, 2),
                        round_to(total_time / total as f64, 2),
                    )
                } else {
                    (0.0, 0.0)
                };

                let breakdown = SeverityBreakdown {
                    total,
                    compliant,
                    pct,
                    penalty_usd: round_to(group.iter().map(|i| i.penalty_usd()).sum(), 2),
                    avg_time_h,
                };
                (severity, breakdown)
            })
            .collect()
    }

    /// Evaluations performed so far.
    pub fn evaluations(&self) -> &[EvaluationRecord] {
        &self.evaluations
    }

    pub fn target_pct(&self) -> f64 {
        self.target_pct
    }
}

impl Default for SLAEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
