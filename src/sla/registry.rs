//! Incident registry.
//!
//! Allocates incident IDs and keeps the incidents of one run.

use crate::core::{round_to, Timestamp};
use crate::domain::{Incident, IncidentStatus, Severity};
use tracing::info;

/// Registry of the incidents raised during a run.
pub struct IncidentRegistry {
    /// Year embedded in generated IDs
    year: i32,
    /// Next sequence number
    counter: u32,
    /// Registered incidents, in order
    incidents: Vec<Incident>,
}

impl IncidentRegistry {
    /// Create an empty registry issuing `INC-<year>-NNN` IDs.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            counter: 1,
            incidents: Vec::new(),
        }
    }

    fn next_id(&mut self) -> String {
        let id = format!("INC-{}-{:03}", self.year, self.counter);
        self.counter += 1;
        id
    }

    /// Open a new incident and return it for further population.
    pub fn register(&mut self, service_name: &str, severity: Severity, created_at: Timestamp) -> &mut Incident {
        let id = self.next_id();
        info!(incident = %id, severity = %severity, "Incident registered");
        self.incidents
            .push(Incident::new(&id, service_name, severity, created_at));
        let last = self.incidents.len() - 1;
        &mut self.incidents[last]
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Look up an incident for mutation.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Incident> {
        self.incidents.iter_mut().find(|i| i.id == id)
    }

    /// Incidents still open.
    pub fn open_incidents(&self) -> Vec<&Incident> {
        self.incidents
            .iter()
            .filter(|i| i.status() == IncidentStatus::Open)
            .collect()
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Incident> {
        self.incidents
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Sum of penalties across all incidents.
    pub fn total_penalty_usd(&self) -> f64 {
        round_to(self.incidents.iter().map(|i| i.penalty_usd()).sum(), 2)
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_sequential_ids() {
        let mut registry = IncidentRegistry::new(2024);
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

        let first = registry.register("Billing", Severity::Low, t).id.clone();
        let second = registry.register("Billing", Severity::High, t).id.clone();

        assert_eq!(first, "INC-2024-001");
        assert_eq!(second, "INC-2024-002");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_queries() {
        let mut registry = IncidentRegistry::new(2024);
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();

        registry.register("Billing", Severity::Critical, t);
        let inc = registry.register("Billing", Severity::Critical, t);
        inc.clients_affected = 1200;
        inc.resolve(t + Duration::hours(3)).unwrap();
        registry.register("Billing", Severity::Low, t);

        assert_eq!(registry.open_incidents().len(), 2);
        assert_eq!(registry.by_severity(Severity::Critical).len(), 2);
        // 2h excess at 5000/h
        assert_eq!(registry.total_penalty_usd(), 10_000.0);

        let found = registry.get_mut("INC-2024-003").unwrap();
        found.acknowledge().unwrap();
        assert_eq!(registry.open_incidents().len(), 1);
    }
}
