//! Seeded data fixtures for a CloudCore run.
//!
//! Every generator draws from the caller's [`RandomSource`] in a fixed
//! order, so one seed reproduces the whole data set. Changing the order of
//! draws here changes every value that follows.

use crate::core::{duration_from_hours, Error, Result, Timestamp};
use crate::domain::{ContinuityScenario, DisruptionType, Incident, Risk, Severity};
use crate::fixtures::source::{choose, choose_weighted, RandomSource};
use crate::governance::{Framework, KPI};
use crate::sla::IncidentRegistry;
use chrono::{Duration, TimeZone, Utc};
use tracing::info;

/// Service every simulated incident is raised against.
pub const BILLING_SERVICE: &str = "CloudCore Billing SaaS";

pub const INCIDENT_TYPES: [&str; 10] = [
    "Database outage",
    "Authentication failure",
    "Billing timeout",
    "Synchronisation error",
    "CPU overload",
    "CDN network failure",
    "REST API error",
    "Backup failure",
    "Expired SSL certificate",
    "Data corruption",
];

pub const TEAMS: [&str; 3] = ["Team Alpha", "Team Beta", "Team Gamma"];

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Months pinned to known degraded values: (index, uptime %).
const DEGRADED_MONTHS: [(usize, f64); 6] = [
    (2, 99.38),
    (4, 99.87),
    (5, 99.87),
    (6, 99.86),
    (7, 99.54),
    (10, 98.52),
];

const SEVERITY_WEIGHTS: [f64; 4] = [0.10, 0.25, 0.35, 0.30];

/// Share of incidents that overrun their ceiling.
const BREACH_CHANCE: f64 = 0.30;

/// Start of the simulated year.
pub fn base_time(year: i32) -> Result<Timestamp> {
    Utc.with_ymd_and_hms(year, 1, 1, 8, 0, 0)
        .single()
        .ok_or_else(|| Error::Config(format!("year {} out of range", year)))
}

/// Register and resolve `count` incidents, returning the registry's contents.
///
/// Per incident the draws are: severity, affected clients, incident type,
/// team, creation offset, breach roll, resolution factor.
pub fn simulate_incidents<S: RandomSource + ?Sized>(
    rng: &mut S,
    registry: &mut IncidentRegistry,
    count: usize,
    base: Timestamp,
) -> Result<Vec<Incident>> {
    for _ in 0..count {
        let severity = *choose_weighted(rng, &Severity::ALL, &SEVERITY_WEIGHTS)?;
        let clients = if severity == Severity::Critical {
            rng.int_in(50, 3000)
        } else {
            rng.int_in(1, 500)
        };
        let incident_type = *choose(rng, &INCIDENT_TYPES);
        let team = *choose(rng, &TEAMS);
        let offset_h = rng.int_in(1, 700);

        let factor = if rng.unit() < BREACH_CHANCE {
            rng.uniform(1.1, 3.0)
        } else {
            rng.uniform(0.3, 0.95)
        };

        let created_at = base + Duration::hours(offset_h);
        let incident = registry.register(BILLING_SERVICE, severity, created_at);
        incident.incident_type = incident_type.to_string();
        incident.team = team.to_string();
        incident.clients_affected = clients as u32;
        let resolution_h = incident.sla_limit_hours() * factor;
        incident.resolve(created_at + duration_from_hours(resolution_h))?;
    }

    info!(count, "Incidents simulated");
    Ok(registry.incidents().to_vec())
}

/// Twelve monthly uptime figures, with the degraded months pinned.
pub fn monthly_uptime<S: RandomSource + ?Sized>(rng: &mut S) -> Vec<(&'static str, f64)> {
    let mut uptimes: Vec<f64> = (0..MONTHS.len()).map(|_| rng.uniform(99.85, 99.99)).collect();
    for (idx, value) in DEGRADED_MONTHS {
        uptimes[idx] = value;
    }
    MONTHS.iter().copied().zip(uptimes).collect()
}

/// The five canonical disruption archetypes, simulated.
///
/// Draws in declared order: ESC-001 RTO, RPO; ESC-002 RTO, RPO; ESC-003
/// clients, RTO, RPO; ESC-004 clients, RTO; ESC-005 clients, RTO.
pub fn default_scenarios<S: RandomSource + ?Sized>(rng: &mut S) -> Result<Vec<ContinuityScenario>> {
    const RTO_OBJECTIVE_H: f64 = 4.0;
    const RPO_OBJECTIVE_H: f64 = 0.25;

    let esc1 = (3000, rng.uniform(2.5, 6.5), rng.uniform(0.1, 0.5));
    let esc2 = (3000, rng.uniform(8.0, 24.0), rng.uniform(1.0, 4.0));
    let esc3 = (
        rng.int_in(1500, 3000),
        rng.uniform(1.5, 5.0),
        rng.uniform(0.05, 0.3),
    );
    let esc4 = (rng.int_in(500, 2000), rng.uniform(0.5, 3.0), 0.0);
    let esc5 = (rng.int_in(100, 800), rng.uniform(0.5, 2.5), 0.0);

    let specs = [
        ("ESC-001", DisruptionType::DatabaseFailure, 0.15, esc1),
        ("ESC-002", DisruptionType::Ransomware, 0.08, esc2),
        ("ESC-003", DisruptionType::CloudOutage, 0.12, esc3),
        ("ESC-004", DisruptionType::NetworkLoss, 0.20, esc4),
        ("ESC-005", DisruptionType::DeployFailure, 0.25, esc5),
    ];

    specs
        .into_iter()
        .map(|(id, kind, probability, (clients, rto, rpo))| -> Result<ContinuityScenario> {
            let mut scenario = ContinuityScenario::new(
                id,
                kind,
                probability,
                RTO_OBJECTIVE_H,
                RPO_OBJECTIVE_H,
                clients as u32,
            )?;
            scenario.simulate(rto, rpo);
            Ok(scenario)
        })
        .collect()
}

/// The operational risk register with one control per risk.
pub fn risk_register() -> Result<Vec<Risk>> {
    let specs = [
        ("RSK-001", "Unavailability from P1/P2 incidents", "Operational", 0.35, 120_000.0, "24/7 monitoring", 0.40),
        ("RSK-002", "Ransomware", "Cybersecurity", 0.08, 295_000.0, "Immutable offline backup", 0.55),
        ("RSK-003", "Database failure", "Infrastructure", 0.15, 60_000.0, "Active-active replica", 0.60),
        ("RSK-004", "Regulatory non-compliance", "Compliance", 0.10, 200_000.0, "Quarterly audit", 0.30),
    ];

    specs
        .into_iter()
        .map(|(id, name, category, probability, impact, control, effectiveness)| -> Result<Risk> {
            let mut risk = Risk::new(id, name, category, probability, impact)?;
            risk.add_control(control, effectiveness)?;
            Ok(risk)
        })
        .collect()
}

/// Committee KPIs fed by the SLA, availability and continuity results.
///
/// `critical_breaches` counts Critical incidents resolved outside their
/// ceiling; more than two is an alert.
pub fn governance_kpis(
    sla_compliance_pct: f64,
    avg_uptime_pct: f64,
    rto_compliance_pct: f64,
    critical_breaches: usize,
) -> Vec<KPI> {
    vec![
        KPI::new("Availability", avg_uptime_pct, 99.9).with_framework(Framework::Iso20000),
        KPI::new("SLA compliance", sla_compliance_pct, 90.0).with_framework(Framework::Itil4),
        KPI::new("Critical SLA breaches", critical_breaches as f64, 2.0)
            .with_unit("u")
            .with_framework(Framework::Itil4)
            .lower_is_better(),
        KPI::new("RTO compliance", rto_compliance_pct, 60.0).with_framework(Framework::Iso22301),
        KPI::new("Customer satisfaction", 82.3, 80.0),
    ]
}
