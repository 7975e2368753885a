//! Service incidents (ITIL 4 incident management).
//!
//! An incident carries its severity-bound SLA ceiling and penalty rate,
//! and moves through a fixed lifecycle.

use crate::core::{hours_between, round_to, Error, Result, Timestamp};
use serde::{Deserialize, Serialize};

/// Incident severity, ordered from most to least urgent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// P1 - platform down
    Critical,
    /// P2 - major feature degraded
    High,
    /// P3 - minor feature affected
    Medium,
    /// P4 - request or question
    Low,
}

impl Severity {
    /// All severities, most urgent first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Maximum resolution time in hours.
    pub fn sla_hours(self) -> f64 {
        match self {
            Severity::Critical => 1.0,
            Severity::High => 4.0,
            Severity::Medium => 8.0,
            Severity::Low => 24.0,
        }
    }

    /// Penalty in USD per hour beyond the SLA ceiling.
    pub fn penalty_per_hour(self) -> f64 {
        match self {
            Severity::Critical => 5000.0,
            Severity::High => 2000.0,
            Severity::Medium => 500.0,
            Severity::Low => 100.0,
        }
    }

    /// Upper-case label.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    /// Registered, not yet worked
    Open,
    /// Acknowledged by a team
    InProgress,
    /// Service restored
    Resolved,
    /// Formally closed (terminal)
    Closed,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Open => write!(f, "Open"),
            IncidentStatus::InProgress => write!(f, "In progress"),
            IncidentStatus::Resolved => write!(f, "Resolved"),
            IncidentStatus::Closed => write!(f, "Closed"),
        }
    }
}

/// A follow-up note.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentNote {
    /// When the note was written
    pub timestamp: Timestamp,
    /// Note text
    pub note: String,
}

/// A service incident.
#[derive(Clone, Debug)]
pub struct Incident {
    /// Incident ID
    pub id: String,
    /// Affected service
    pub service_name: String,
    /// Severity
    pub severity: Severity,
    /// Incident category (free text)
    pub incident_type: String,
    /// Owning team
    pub team: String,
    /// Number of affected clients
    pub clients_affected: u32,
    status: IncidentStatus,
    created_at: Timestamp,
    resolved_at: Option<Timestamp>,
    notes: Vec<IncidentNote>,
}

impl Incident {
    /// Open a new incident at `created_at`.
    pub fn new(id: &str, service_name: &str, severity: Severity, created_at: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            service_name: service_name.to_string(),
            severity,
            incident_type: String::new(),
            team: String::new(),
            clients_affected: 0,
            status: IncidentStatus::Open,
            created_at,
            resolved_at: None,
            notes: Vec::new(),
        }
    }

    /// Set incident type.
    pub fn with_type(mut self, incident_type: &str) -> Self {
        self.incident_type = incident_type.to_string();
        self
    }

    /// Set owning team.
    pub fn with_team(mut self, team: &str) -> Self {
        self.team = team.to_string();
        self
    }

    /// Set affected client count.
    pub fn with_clients(mut self, clients: u32) -> Self {
        self.clients_affected = clients;
        self
    }

    /// Current status.
    pub fn status(&self) -> IncidentStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Resolution time, if resolved.
    pub fn resolved_at(&self) -> Option<Timestamp> {
        self.resolved_at
    }

    /// Follow-up notes, oldest first.
    pub fn notes(&self) -> &[IncidentNote] {
        &self.notes
    }

    fn transition_error(&self, to: IncidentStatus) -> Error {
        Error::InvalidTransition {
            id: self.id.clone(),
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }

    /// Move an open incident into progress.
    pub fn acknowledge(&mut self) -> Result<()> {
        if self.status != IncidentStatus::Open {
            return Err(self.transition_error(IncidentStatus::InProgress));
        }
        self.status = IncidentStatus::InProgress;
        Ok(())
    }

    /// Mark the incident resolved at `resolved_at`.
    pub fn resolve(&mut self, resolved_at: Timestamp) -> Result<()> {
        if !matches!(self.status, IncidentStatus::Open | IncidentStatus::InProgress) {
            return Err(self.transition_error(IncidentStatus::Resolved));
        }
        if resolved_at < self.created_at {
            return Err(Error::InvalidTimeRange(self.id.clone()));
        }
        self.resolved_at = Some(resolved_at);
        self.status = IncidentStatus::Resolved;
        Ok(())
    }

    /// Close a resolved incident.
    pub fn close(&mut self) -> Result<()> {
        if self.status != IncidentStatus::Resolved {
            return Err(self.transition_error(IncidentStatus::Closed));
        }
        self.status = IncidentStatus::Closed;
        Ok(())
    }

    /// Append a follow-up note.
    pub fn add_note(&mut self, note: &str, at: Timestamp) -> Result<()> {
        if self.status == IncidentStatus::Closed {
            return Err(Error::IncidentClosed(self.id.clone()));
        }
        self.notes.push(IncidentNote {
            timestamp: at,
            note: note.to_string(),
        });
        Ok(())
    }

    /// Hours from creation to resolution.
    pub fn resolution_hours(&self) -> Option<f64> {
        self.resolved_at
            .map(|resolved| hours_between(self.created_at, resolved))
    }

    /// SLA ceiling for this incident's severity.
    pub fn sla_limit_hours(&self) -> f64 {
        self.severity.sla_hours()
    }

    /// Whether the incident was resolved within its ceiling.
    pub fn meets_sla(&self) -> bool {
        self.resolution_hours()
            .map(|t| t <= self.sla_limit_hours())
            .unwrap_or(false)
    }

    /// Hours beyond the ceiling.
    pub fn excess_hours(&self) -> Option<f64> {
        self.resolution_hours()
            .map(|t| (t - self.sla_limit_hours()).max(0.0))
    }

    /// Penalty owed for the excess. Nothing accrues until resolution.
    pub fn penalty_usd(&self) -> f64 {
        let excess = self.excess_hours().unwrap_or(0.0);
        round_to(excess * self.severity.penalty_per_hour(), 2)
    }

    /// Serializable view with every derived metric.
    pub fn to_record(&self) -> IncidentRecord {
        IncidentRecord {
            incident_id: self.id.clone(),
            service_name: self.service_name.clone(),
            severity: self.severity,
            incident_type: self.incident_type.clone(),
            team: self.team.clone(),
            clients_affected: self.clients_affected,
            status: self.status,
            created_at: self.created_at,
            resolved_at: self.resolved_at,
            resolution_time_h: self.resolution_hours().map(|t| round_to(t, 4)),
            sla_limit_h: self.sla_limit_hours(),
            meets_sla: self.meets_sla(),
            excess_h: self.excess_hours().map(|e| round_to(e, 4)),
            penalty_usd: self.penalty_usd(),
            notes: self.notes.clone(),
        }
    }
}

impl std::fmt::Display for Incident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Incident {} | {} | {} | SLA: {}>",
            self.id,
            self.severity,
            self.status,
            if self.meets_sla() { "✓" } else { "✗" }
        )
    }
}

/// Flat incident record for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub incident_id: String,
    pub service_name: String,
    pub severity: Severity,
    pub incident_type: String,
    pub team: String,
    pub clients_affected: u32,
    pub status: IncidentStatus,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    pub resolution_time_h: Option<f64>,
    pub sla_limit_h: f64,
    pub meets_sla: bool,
    pub excess_h: Option<f64>,
    pub penalty_usd: f64,
    pub notes: Vec<IncidentNote>,
}

impl IncidentRecord {
    /// Recompute SLA compliance from the raw timestamps and severity.
    pub fn derive_meets_sla(&self) -> bool {
        self.resolved_at
            .map(|resolved| hours_between(self.created_at, resolved) <= self.severity.sla_hours())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn base() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    fn resolved_after(severity: Severity, minutes: i64) -> Incident {
        let mut inc = Incident::new("INC-1", "Billing", severity, base());
        inc.resolve(base() + Duration::minutes(minutes)).unwrap();
        inc
    }

    #[test]
    fn test_open_incident_has_no_metrics() {
        let inc = Incident::new("INC-1", "Billing", Severity::High, base());
        assert_eq!(inc.status(), IncidentStatus::Open);
        assert_eq!(inc.resolution_hours(), None);
        assert_eq!(inc.excess_hours(), None);
        assert!(!inc.meets_sla());
        assert_eq!(inc.penalty_usd(), 0.0);
    }

    #[test]
    fn test_resolution_at_ceiling_is_compliant() {
        let inc = resolved_after(Severity::High, 4 * 60);
        assert_eq!(inc.resolution_hours(), Some(4.0));
        assert!(inc.meets_sla());
        assert_eq!(inc.excess_hours(), Some(0.0));
        assert_eq!(inc.penalty_usd(), 0.0);
    }

    #[test]
    fn test_breach_penalty() {
        // 2.5h on a 1h ceiling: 1.5h excess at 5000/h
        let inc = resolved_after(Severity::Critical, 150);
        assert!(!inc.meets_sla());
        assert_eq!(inc.excess_hours(), Some(1.5));
        assert_eq!(inc.penalty_usd(), 7500.0);
    }

    #[test]
    fn test_severity_tables() {
        let ceilings: Vec<f64> = Severity::ALL.iter().map(|s| s.sla_hours()).collect();
        assert_eq!(ceilings, vec![1.0, 4.0, 8.0, 24.0]);
        assert_eq!(Severity::Medium.penalty_per_hour(), 500.0);
        assert!(Severity::Critical < Severity::Low);
    }

    #[test]
    fn test_lifecycle() {
        let mut inc = Incident::new("INC-1", "Billing", Severity::Low, base());
        inc.acknowledge().unwrap();
        assert_eq!(inc.status(), IncidentStatus::InProgress);
        inc.add_note("rollback started", base()).unwrap();

        inc.resolve(base() + Duration::hours(2)).unwrap();
        assert!(inc.acknowledge().is_err());
        inc.close().unwrap();
        assert_eq!(inc.status(), IncidentStatus::Closed);

        assert!(matches!(
            inc.add_note("late", base()),
            Err(Error::IncidentClosed(_))
        ));
        assert!(inc.resolve(base() + Duration::hours(3)).is_err());
        assert_eq!(inc.notes().len(), 1);
    }

    #[test]
    fn test_close_requires_resolution() {
        let mut inc = Incident::new("INC-1", "Billing", Severity::Low, base());
        assert!(matches!(
            inc.close(),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_resolution_before_creation_rejected() {
        let mut inc = Incident::new("INC-1", "Billing", Severity::Low, base());
        let result = inc.resolve(base() - Duration::minutes(1));
        assert!(matches!(result, Err(Error::InvalidTimeRange(_))));
        assert_eq!(inc.status(), IncidentStatus::Open);
    }

    #[test]
    fn test_record_rederives_flags() {
        for minutes in [30, 60, 61, 600] {
            let inc = resolved_after(Severity::Critical, minutes);
            let record = inc.to_record();
            assert_eq!(record.derive_meets_sla(), inc.meets_sla());
            assert_eq!(record.meets_sla, inc.meets_sla());
        }

        let open = Incident::new("INC-2", "Billing", Severity::Low, base()).to_record();
        assert!(!open.derive_meets_sla());
        assert_eq!(open.resolution_time_h, None);
    }

    #[test]
    fn test_record_serializes() {
        let inc = resolved_after(Severity::Medium, 90).with_team("Alpha");
        let json = serde_json::to_string(&inc.to_record()).unwrap();
        assert!(json.contains("\"incident_id\":\"INC-1\""));
        assert!(json.contains("\"resolution_time_h\":1.5"));

        let back: IncidentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inc.to_record());
    }

    #[test]
    fn test_accessors_idempotent() {
        let inc = resolved_after(Severity::High, 300);
        assert_eq!(inc.penalty_usd(), inc.penalty_usd());
        assert_eq!(inc.excess_hours(), inc.excess_hours());
    }
}
