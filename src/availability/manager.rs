//! Availability tracking (ISO/IEC 20000).
//!
//! Two modes share one manager: direct downtime accumulation against a
//! fixed period, and per-period records rolled into an annual summary.

use crate::core::round_to;
use crate::domain::service::{Service, DOWNTIME_COST_PER_HOUR_USD};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Average hours per month.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Default availability target (%).
pub const DEFAULT_AVAILABILITY_TARGET_PCT: f64 = 99.9;

/// Overall availability status for a year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    Compliant,
    NeedsImprovement,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityStatus::Compliant => write!(f, "Compliant"),
            AvailabilityStatus::NeedsImprovement => write!(f, "Needs improvement"),
        }
    }
}

/// Availability measured for one period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    /// Period label (e.g. month)
    pub month: String,
    /// Uptime (%)
    pub uptime_pct: f64,
    /// Hours of downtime
    pub hours_down: f64,
    /// Minutes of downtime
    pub minutes_down: f64,
    /// Uptime met the target
    pub meets_sla: bool,
    /// Cost of the downtime (USD)
    pub financial_impact: f64,
}

/// Annual roll-up of period records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnualAvailabilitySummary {
    pub avg_annual_uptime_pct: f64,
    pub months_compliant: usize,
    pub months_non_compliant: usize,
    pub non_compliant_months: Vec<String>,
    pub total_financial_impact: f64,
    pub global_status: AvailabilityStatus,
}

/// Window availability of a monitored service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceAvailability {
    pub service_id: String,
    pub availability_pct: f64,
    pub meets_sla: bool,
    pub financial_impact: f64,
}

/// Availability manager.
pub struct AvailabilityManager {
    /// Length of the direct-mode period (minutes)
    total_minutes: f64,
    /// Accumulated direct-mode downtime (minutes)
    downtime_minutes: f64,
    /// Monitored services
    services: Vec<Service>,
    /// Per-period records, in registration order
    records: Vec<AvailabilityRecord>,
}

impl AvailabilityManager {
    /// Create a manager over `total_minutes`, defaulting to one 730-hour-month year.
    pub fn new(total_minutes: Option<f64>) -> Self {
        Self {
            total_minutes: total_minutes.unwrap_or(HOURS_PER_MONTH * 60.0 * 12.0),
            downtime_minutes: 0.0,
            services: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn total_minutes(&self) -> f64 {
        self.total_minutes
    }

    /// Accumulate direct downtime.
    pub fn register_downtime(&mut self, minutes: f64) {
        self.downtime_minutes += minutes;
    }

    /// Availability (%) of the direct-mode period.
    pub fn calculate_availability(&self) -> f64 {
        if self.total_minutes == 0.0 {
            return 100.0;
        }
        let uptime = self.total_minutes - self.downtime_minutes;
        round_to(uptime / self.total_minutes * 100.0, 4)
    }

    pub fn evaluate_sla(&self, target_pct: f64) -> bool {
        self.calculate_availability() >= target_pct
    }

    /// Add a service to monitor.
    pub fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Availability of each monitored service over `total_hours`.
    pub fn service_availability(&self, total_hours: f64) -> Vec<ServiceAvailability> {
        self.services
            .iter()
            .map(|s| ServiceAvailability {
                service_id: s.id.clone(),
                availability_pct: s.availability(total_hours),
                meets_sla: s.meets_sla(total_hours),
                financial_impact: s.total_financial_impact(),
            })
            .collect()
    }

    /// Record one period's availability.
    pub fn record_period(
        &mut self,
        month: &str,
        uptime_pct: f64,
        hours_down: f64,
        target_pct: f64,
    ) -> &AvailabilityRecord {
        let record = AvailabilityRecord {
            month: month.to_string(),
            uptime_pct: round_to(uptime_pct, 4),
            hours_down: round_to(hours_down, 2),
            minutes_down: round_to(hours_down * 60.0, 1),
            meets_sla: uptime_pct >= target_pct,
            financial_impact: round_to(hours_down * DOWNTIME_COST_PER_HOUR_USD, 2),
        };
        info!(
            month = %record.month,
            uptime_pct = record.uptime_pct,
            hours_down = record.hours_down,
            meets_sla = record.meets_sla,
            impact_usd = record.financial_impact,
            "Availability recorded"
        );
        self.records.push(record);
        let last = self.records.len() - 1;
        &self.records[last]
    }

    pub fn records(&self) -> &[AvailabilityRecord] {
        &self.records
    }

    /// Roll the period records up. `None` when nothing was recorded.
    pub fn annual_summary(&self, target_pct: f64) -> Option<AnnualAvailabilitySummary> {
        if self.records.is_empty() {
            return None;
        }

        let count = self.records.len();
        let avg_uptime = self.records.iter().map(|r| r.uptime_pct).sum::<f64>() / count as f64;
        let months_compliant = self.records.iter().filter(|r| r.meets_sla).count();
        let non_compliant_months: Vec<String> = self
            .records
            .iter()
            .filter(|r| !r.meets_sla)
            .map(|r| r.month.clone())
            .collect();
        let total_cost: f64 = self.records.iter().map(|r| r.financial_impact).sum();

        let summary = AnnualAvailabilitySummary {
            avg_annual_uptime_pct: round_to(avg_uptime, 4),
            months_compliant,
            months_non_compliant: count - months_compliant,
            non_compliant_months,
            total_financial_impact: round_to(total_cost, 2),
            global_status: if avg_uptime >= target_pct {
                AvailabilityStatus::Compliant
            } else {
                AvailabilityStatus::NeedsImprovement
            },
        };

        warn!(
            avg_uptime_pct = summary.avg_annual_uptime_pct,
            non_compliant = ?summary.non_compliant_months,
            impact_usd = summary.total_financial_impact,
            "Annual availability"
        );
        Some(summary)
    }
}

impl Default for AvailabilityManager {
    fn default() -> Self {
        Self::new(None)
    }
}
