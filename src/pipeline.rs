//! End-to-end compliance run.
//!
//! Seeds one generator and executes incidents, SLA, availability,
//! continuity, governance and risk, then assembles the integrated report.

use crate::availability::AvailabilityManager;
use crate::continuity::RecoverySimulator;
use crate::core::{duration_from_hours, ModelConfig, Result};
use crate::domain::{Service, Severity};
use crate::fixtures::{
    base_time, default_scenarios, governance_kpis, monthly_uptime, risk_register, seeded,
    simulate_incidents, BILLING_SERVICE,
};
use crate::governance::GovernanceDashboard;
use crate::report::{IntegratedReport, ReportInput};
use crate::sla::{IncidentRegistry, SLAEvaluator};
use tracing::info;

/// Execute one run from `config`.
pub fn run(config: &ModelConfig) -> Result<IntegratedReport> {
    config.validate()?;
    info!(seed = config.seed, incidents = config.incident_count, "Compliance run started");

    let mut rng = seeded(config.seed);
    let base = base_time(config.year)?;

    // ITIL 4
    let mut registry = IncidentRegistry::new(config.year);
    let incidents = simulate_incidents(&mut rng, &mut registry, config.incident_count, base)?;
    let mut evaluator = SLAEvaluator::with_target(config.sla_target_pct);
    let sla = evaluator.evaluate_batch(&incidents);
    let sla_by_severity = evaluator.compliance_by_severity(&incidents);

    // ISO/IEC 20000
    let total_minutes = config.hours_per_month * 12.0 * 60.0;
    let mut availability = AvailabilityManager::new(Some(total_minutes));
    let mut billing = Service::new("SVC-001", BILLING_SERVICE, 1)
        .with_target(config.availability_target_pct);
    for (idx, (month, uptime)) in monthly_uptime(&mut rng).into_iter().enumerate() {
        let hours_down = config.hours_per_month * (1.0 - uptime / 100.0);
        availability.record_period(month, uptime, hours_down, config.availability_target_pct);
        availability.register_downtime(hours_down * 60.0);

        let start = base + duration_from_hours(config.hours_per_month * idx as f64);
        billing.register_downtime(start, start + duration_from_hours(hours_down), &format!("{} downtime", month))?;
    }
    availability.add_service(billing);
    let annual = availability.annual_summary(config.availability_target_pct);
    let direct_availability_pct = availability.calculate_availability();
    let services_availability = availability.service_availability(config.hours_per_month * 12.0);
    info!(
        direct_pct = direct_availability_pct,
        meets_target = availability.evaluate_sla(config.availability_target_pct),
        "Direct availability measured"
    );
    let services = availability
        .services()
        .iter()
        .map(|s| s.to_record())
        .collect();

    // ISO 22301
    let mut simulator = RecoverySimulator::from_hours(config.rto_hours);
    for scenario in default_scenarios(&mut rng)? {
        simulator.add_scenario(scenario);
    }
    let scenarios = simulator.run_all();
    let continuity = simulator.continuity_summary();

    // COBIT 2019
    let avg_uptime = annual.as_ref().map(|a| a.avg_annual_uptime_pct).unwrap_or(0.0);
    let rto_pct = continuity.as_ref().map(|c| c.rto_compliance_pct).unwrap_or(0.0);
    let mut dashboard =
        GovernanceDashboard::new(&config.period).with_tolerance(config.max_alerts_tolerated);
    let critical_breaches = incidents
        .iter()
        .filter(|i| i.severity == Severity::Critical && !i.meets_sla())
        .count();
    for kpi in governance_kpis(sla.compliance_rate_pct, avg_uptime, rto_pct, critical_breaches) {
        dashboard.add_kpi(kpi);
    }
    let risks = risk_register()?.iter().map(|r| r.to_record()).collect();

    let report = IntegratedReport::assemble(ReportInput {
        seed: config.seed,
        period: config.period.clone(),
        incidents: incidents.iter().map(|i| i.to_record()).collect(),
        sla,
        sla_by_severity,
        availability_months: availability.records().to_vec(),
        availability: annual,
        direct_availability_pct,
        services,
        services_availability,
        governance: dashboard.to_record(),
        risks,
        scenarios,
        continuity,
    });

    info!(run_id = %report.run_id, "Compliance run finished");
    Ok(report)
}
