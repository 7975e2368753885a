//! IT services and their downtime history (ISO/IEC 20000).

use crate::core::{hours_between, round_to, Error, Result, Timestamp};
use serde::{Deserialize, Serialize};

/// Cost of one hour of unavailability in USD.
pub const DOWNTIME_COST_PER_HOUR_USD: f64 = 15_000.0;

/// Operational status of a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    Operational,
    Degraded,
    Outage,
    Maintenance,
}

/// A recorded period of unavailability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DowntimeEvent {
    /// Outage start
    pub start: Timestamp,
    /// Outage end
    pub end: Timestamp,
    /// Root cause
    pub cause: String,
}

impl DowntimeEvent {
    /// Duration in hours (4 decimals).
    pub fn duration_hours(&self) -> f64 {
        round_to(hours_between(self.start, self.end), 4)
    }

    /// Cost of the outage in USD.
    pub fn cost_usd(&self) -> f64 {
        round_to(
            hours_between(self.start, self.end) * DOWNTIME_COST_PER_HOUR_USD,
            2,
        )
    }
}

/// A catalogued IT service.
#[derive(Clone, Debug)]
pub struct Service {
    /// Service ID
    pub id: String,
    /// Service name
    pub name: String,
    /// Tier (1 = critical, 2 = important, 3 = standard)
    pub tier: u8,
    /// Target availability (%)
    pub sla_availability_pct: f64,
    /// Current status
    pub status: ServiceStatus,
    downtime_events: Vec<DowntimeEvent>,
}

impl Service {
    /// Create an operational service with the default 99.9% target.
    pub fn new(id: &str, name: &str, tier: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tier: tier.clamp(1, 3),
            sla_availability_pct: 99.9,
            status: ServiceStatus::Operational,
            downtime_events: Vec::new(),
        }
    }

    /// Set the availability target.
    pub fn with_target(mut self, pct: f64) -> Self {
        self.sla_availability_pct = pct;
        self
    }

    /// Record an outage.
    pub fn register_downtime(&mut self, start: Timestamp, end: Timestamp, cause: &str) -> Result<()> {
        if end < start {
            return Err(Error::InvalidTimeRange(self.id.clone()));
        }
        self.downtime_events.push(DowntimeEvent {
            start,
            end,
            cause: cause.to_string(),
        });
        Ok(())
    }

    /// Recorded outages, in registration order.
    pub fn downtime_events(&self) -> &[DowntimeEvent] {
        &self.downtime_events
    }

    pub fn total_downtime_hours(&self) -> f64 {
        self.downtime_events.iter().map(|e| e.duration_hours()).sum()
    }

    /// Availability (%) over a window of `total_hours`.
    pub fn availability(&self, total_hours: f64) -> f64 {
        if total_hours == 0.0 {
            return 100.0;
        }
        let uptime = total_hours - self.total_downtime_hours();
        round_to(uptime / total_hours * 100.0, 4)
    }

    pub fn meets_sla(&self, total_hours: f64) -> bool {
        self.availability(total_hours) >= self.sla_availability_pct
    }

    /// Total cost of all outages in USD.
    pub fn total_financial_impact(&self) -> f64 {
        round_to(self.downtime_events.iter().map(|e| e.cost_usd()).sum(), 2)
    }

    pub fn set_status(&mut self, status: ServiceStatus) {
        self.status = status;
    }

    /// Serializable view with derived totals.
    pub fn to_record(&self) -> ServiceRecord {
        ServiceRecord {
            service_id: self.id.clone(),
            name: self.name.clone(),
            tier: self.tier,
            sla_availability_pct: self.sla_availability_pct,
            status: self.status,
            total_downtime_h: round_to(self.total_downtime_hours(), 4),
            total_cost_usd: self.total_financial_impact(),
            downtime_events: self
                .downtime_events
                .iter()
                .map(|e| DowntimeRecord {
                    start: e.start,
                    end: e.end,
                    cause: e.cause.clone(),
                    duration_h: e.duration_hours(),
                    cost_usd: e.cost_usd(),
                })
                .collect(),
        }
    }
}

/// Flat downtime event for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DowntimeRecord {
    pub start: Timestamp,
    pub end: Timestamp,
    pub cause: String,
    pub duration_h: f64,
    pub cost_usd: f64,
}

/// Flat service record for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub service_id: String,
    pub name: String,
    pub tier: u8,
    pub sla_availability_pct: f64,
    pub status: ServiceStatus,
    pub total_downtime_h: f64,
    pub total_cost_usd: f64,
    pub downtime_events: Vec<DowntimeRecord>,
}

impl ServiceRecord {
    /// Recompute window compliance from the exported downtime events.
    pub fn derive_meets_sla(&self, total_hours: f64) -> bool {
        if total_hours == 0.0 {
            return 100.0 >= self.sla_availability_pct;
        }
        let down: f64 = self.downtime_events.iter().map(|e| e.duration_h).sum();
        round_to((total_hours - down) / total_hours * 100.0, 4) >= self.sla_availability_pct
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_no_downtime() {
        let svc = Service::new("SVC-1", "Billing", 1);
        assert_eq!(svc.total_downtime_hours(), 0.0);
        assert_eq!(svc.availability(730.0), 100.0);
        assert!(svc.meets_sla(730.0));
    }

    #[test]
    fn test_zero_window_is_full_availability() {
        let mut svc = Service::new("SVC-1", "Billing", 1);
        svc.register_downtime(start(), start() + Duration::hours(1), "db")
            .unwrap();
        assert_eq!(svc.availability(0.0), 100.0);
    }

    #[test]
    fn test_downtime_costs() {
        let mut svc = Service::new("SVC-1", "Billing", 1);
        svc.register_downtime(start(), start() + Duration::minutes(30), "deploy")
            .unwrap();
        svc.register_downtime(start(), start() + Duration::hours(2), "network")
            .unwrap();

        assert_eq!(svc.total_downtime_hours(), 2.5);
        assert_eq!(svc.total_financial_impact(), 37_500.0);
        // (730 - 2.5) / 730
        assert_eq!(svc.availability(730.0), 99.6575);
        assert!(!svc.meets_sla(730.0));
    }

    #[test]
    fn test_inverted_event_rejected() {
        let mut svc = Service::new("SVC-1", "Billing", 1);
        let result = svc.register_downtime(start(), start() - Duration::minutes(5), "clock");
        assert!(matches!(result, Err(Error::InvalidTimeRange(_))));
        assert!(svc.downtime_events().is_empty());
    }

    #[test]
    fn test_record_rederives_flags() {
        let mut svc = Service::new("SVC-1", "Billing", 1).with_target(99.5);
        svc.register_downtime(start(), start() + Duration::hours(3), "storage")
            .unwrap();
        svc.set_status(ServiceStatus::Degraded);

        let record = svc.to_record();
        for window in [0.0, 100.0, 730.0, 8760.0] {
            assert_eq!(record.derive_meets_sla(window), svc.meets_sla(window));
        }
        assert_eq!(record.status, ServiceStatus::Degraded);
        assert_eq!(record.downtime_events[0].cost_usd, 45_000.0);
    }
}
