//! Integrated report rendering and export.
//!
//! Renders the executive text report, the JSON document, CSV tables and a
//! SHA3-256 digest of the JSON, and writes them to an output directory.

use crate::availability::{AnnualAvailabilitySummary, AvailabilityRecord, ServiceAvailability};
use crate::continuity::ContinuitySummary;
use crate::core::{now, round_to, Hash256, Result, Timestamp};
use crate::domain::{IncidentRecord, RiskRecord, ScenarioRecord, Severity, ServiceRecord};
use crate::governance::{DashboardRecord, KPIRecord, KPIStatus};
use crate::report::maturity::MaturityAssessment;
use crate::sla::{SLABatchSummary, SeverityBreakdown};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Stdout / export format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Executive text report
    Text,
    /// Pretty JSON document
    Json,
    /// Incident table as CSV
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegratedReport {
    /// Run identifier
    pub run_id: String,
    /// Generated timestamp
    pub generated: Timestamp,
    /// Seed the run was drawn from
    pub seed: u64,
    /// Reporting period
    pub period: String,
    /// Incident records
    pub incidents: Vec<IncidentRecord>,
    /// SLA batch summary
    pub sla: SLABatchSummary,
    /// Per-severity breakdown
    pub sla_by_severity: BTreeMap<Severity, SeverityBreakdown>,
    /// Monthly availability records
    pub availability_months: Vec<AvailabilityRecord>,
    /// Annual availability roll-up
    pub availability: Option<AnnualAvailabilitySummary>,
    /// Year-long availability from accumulated downtime minutes (%)
    pub direct_availability_pct: f64,
    /// Monitored services
    pub services: Vec<ServiceRecord>,
    /// Per-service availability over the year
    pub services_availability: Vec<ServiceAvailability>,
    /// Governance dashboard snapshot
    pub governance: DashboardRecord,
    /// Risk register
    pub risks: Vec<RiskRecord>,
    /// Sum of residual risk (USD)
    pub total_residual_risk_usd: f64,
    /// Continuity scenario records
    pub scenarios: Vec<ScenarioRecord>,
    /// Continuity roll-up
    pub continuity: Option<ContinuitySummary>,
    /// Integrated maturity
    pub maturity: MaturityAssessment,
}

/// Report sections assembled by the pipeline.
pub struct ReportInput {
    pub seed: u64,
    pub period: String,
    pub incidents: Vec<IncidentRecord>,
    pub sla: SLABatchSummary,
    pub sla_by_severity: BTreeMap<Severity, SeverityBreakdown>,
    pub availability_months: Vec<AvailabilityRecord>,
    pub availability: Option<AnnualAvailabilitySummary>,
    pub direct_availability_pct: f64,
    pub services: Vec<ServiceRecord>,
    pub services_availability: Vec<ServiceAvailability>,
    pub governance: DashboardRecord,
    pub risks: Vec<RiskRecord>,
    pub scenarios: Vec<ScenarioRecord>,
    pub continuity: Option<ContinuitySummary>,
}

impl IntegratedReport {
    /// Assemble a report and score its maturity.
    pub fn assemble(input: ReportInput) -> Self {
        let maturity = MaturityAssessment::assess(
            &input.sla,
            input.availability.as_ref(),
            &input.governance,
            input.continuity.as_ref(),
        );
        let total_residual_risk_usd =
            round_to(input.risks.iter().map(|r| r.residual_risk_usd).sum(), 2);

        info!(
            score = maturity.score,
            maturity = maturity.level.label(),
            "Integrated maturity assessed"
        );

        Self {
            run_id: Uuid::new_v4().to_string(),
            generated: now(),
            seed: input.seed,
            period: input.period,
            incidents: input.incidents,
            sla: input.sla,
            sla_by_severity: input.sla_by_severity,
            availability_months: input.availability_months,
            availability: input.availability,
            direct_availability_pct: input.direct_availability_pct,
            services: input.services,
            services_availability: input.services_availability,
            governance: input.governance,
            risks: input.risks,
            total_residual_risk_usd,
            scenarios: input.scenarios,
            continuity: input.continuity,
            maturity,
        }
    }
}

/// Renders and writes integrated reports.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Render in the given format.
    pub fn render(report: &IntegratedReport, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Text => Ok(Self::to_text(report)),
            ExportFormat::Json => Self::to_json(report),
            ExportFormat::Csv => Ok(Self::incidents_csv(&report.incidents)),
        }
    }

    /// Generate report as JSON.
    pub fn to_json(report: &IntegratedReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// SHA3-256 of the JSON document.
    pub fn digest(report: &IntegratedReport) -> Result<Hash256> {
        let json = Self::to_json(report)?;
        Ok(Hash256::digest(json.as_bytes()))
    }

    /// Generate the executive text report.
    pub fn to_text(report: &IntegratedReport) -> String {
        let rule = "=".repeat(65);
        let thin = "-".repeat(65);
        let mut output = String::new();

        output.push_str(&format!("{}\n", rule));
        output.push_str("  EXECUTIVE REPORT - CLOUDCORE SAAS COMPLIANCE MODEL\n");
        output.push_str("  Frameworks: ITIL 4 | ISO/IEC 20000 | COBIT 2019 | ISO 22301\n");
        output.push_str(&format!(
            "  Period: {} | Generated: {} | Seed: {}\n",
            report.period,
            report.generated.format("%Y-%m-%d %H:%M UTC"),
            report.seed
        ));
        output.push_str(&format!("{}\n", rule));

        // ITIL 4
        let sla = &report.sla;
        output.push_str("\n[ITIL 4] Incident management\n");
        output.push_str(&format!("{}\n", thin));
        output.push_str(&format!("  Incidents evaluated:   {}\n", sla.total_incidents));
        output.push_str(&format!("  Within SLA:            {}\n", sla.compliant));
        output.push_str(&format!("  SLA compliance:        {:.2}%\n", sla.compliance_rate_pct));
        output.push_str(&format!("  Total penalties:       ${:.2}\n", sla.total_penalty_usd));
        output.push_str(&format!("  Status:                {}\n", sla.sla_status));
        for (severity, b) in &report.sla_by_severity {
            output.push_str(&format!(
                "    {:<9} {:>2}/{:<2} ({:>6.2}%)  avg {:>6.2} h  penalty ${:.2}\n",
                severity.as_str(),
                b.compliant,
                b.total,
                b.pct,
                b.avg_time_h,
                b.penalty_usd
            ));
        }

        // ISO/IEC 20000
        output.push_str("\n[ISO/IEC 20000] Service availability\n");
        output.push_str(&format!("{}\n", thin));
        match &report.availability {
            Some(a) => {
                output.push_str(&format!("  Average annual uptime: {:.4}%\n", a.avg_annual_uptime_pct));
                output.push_str(&format!(
                    "  Months compliant:      {}/{}\n",
                    a.months_compliant,
                    a.months_compliant + a.months_non_compliant
                ));
                if !a.non_compliant_months.is_empty() {
                    output.push_str(&format!(
                        "  Months below target:   {}\n",
                        a.non_compliant_months.join(", ")
                    ));
                }
                output.push_str(&format!("  Downtime cost:         ${:.2}\n", a.total_financial_impact));
                output.push_str(&format!("  Status:                {}\n", a.global_status));
            }
            None => output.push_str("  No availability periods recorded\n"),
        }
        output.push_str(&format!(
            "  Direct measurement:    {:.4}%\n",
            report.direct_availability_pct
        ));
        for svc in &report.services_availability {
            output.push_str(&format!(
                "  Service {}:        {:.4}% ({}) ${:.2}\n",
                svc.service_id,
                svc.availability_pct,
                if svc.meets_sla { "meets target" } else { "below target" },
                svc.financial_impact
            ));
        }

        // COBIT 2019
        let gov = &report.governance;
        output.push_str("\n[COBIT 2019] IT governance\n");
        output.push_str(&format!("{}\n", thin));
        for kpi in &gov.kpis {
            let icon = if kpi.status == KPIStatus::Alert { "✗" } else { "✓" };
            output.push_str(&format!(
                "  {} {:<35} {:>8.2}{} (threshold {:.2})\n",
                icon, kpi.name, kpi.value, kpi.unit, kpi.threshold
            ));
        }
        output.push_str(&format!("  Alerts:                {}\n", gov.alerts_count));
        output.push_str(&format!(
            "  Maturity:              {}/5 - {}\n",
            gov.maturity_level, gov.maturity_desc
        ));
        output.push_str(&format!("  Status:                {}\n", gov.governance_status));
        output.push_str("  Committee decisions:\n");
        for decision in &gov.committee_decisions {
            output.push_str(&format!("    - {}\n", decision));
        }

        output.push_str("\n  Risk register\n");
        for risk in &report.risks {
            output.push_str(&format!(
                "    [{}] {:<32} residual ${:>10.2}  {}{}\n",
                risk.risk_id,
                risk.name,
                risk.residual_risk_usd,
                risk.risk_level,
                if risk.exceeds_appetite { "  OVER APPETITE" } else { "" }
            ));
        }
        output.push_str(&format!(
            "  Total residual risk:   ${:.2}\n",
            report.total_residual_risk_usd
        ));

        // ISO 22301
        output.push_str("\n[ISO 22301] Business continuity\n");
        output.push_str(&format!("{}\n", thin));
        match &report.continuity {
            Some(c) => {
                output.push_str(&format!(
                    "  RTO compliance:        {}/{} ({:.1}%)\n",
                    c.rto_compliant, c.total_scenarios, c.rto_compliance_pct
                ));
                output.push_str(&format!(
                    "  RPO compliance:        {}/{} ({:.1}%)\n",
                    c.rpo_compliant, c.total_scenarios, c.rpo_compliance_pct
                ));
                output.push_str(&format!("  Financial impact:      ${:.2}\n", c.total_financial_impact_usd));
                output.push_str(&format!("  Residual risk:         ${:.2}\n", c.total_residual_risk_usd));
                if !c.critical_scenarios.is_empty() {
                    output.push_str(&format!(
                        "  RTO breached:          {}\n",
                        c.critical_scenarios.join(", ")
                    ));
                }
            }
            None => output.push_str("  No continuity scenarios run\n"),
        }

        // Integrated
        let m = &report.maturity;
        output.push_str(&format!("\n{}\n", rule));
        output.push_str(&format!("  INTEGRATED MATURITY: {}/5 - {}\n", m.score, m.level.label()));
        for criterion in &m.criteria {
            let icon = if criterion.met { "✓" } else { "✗" };
            output.push_str(&format!("    {} {}\n", icon, criterion.description));
        }
        output.push_str(&format!("{}\n", rule));

        output
    }

    /// Incident table.
    pub fn incidents_csv(records: &[IncidentRecord]) -> String {
        let mut output = String::new();
        output.push_str(
            "incident_id,service,severity,type,team,clients_affected,status,created_at,\
             resolved_at,resolution_time_h,sla_limit_h,meets_sla,excess_h,penalty_usd\n",
        );

        for r in records {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{:.2}\n",
                csv_field(&r.incident_id),
                csv_field(&r.service_name),
                r.severity.as_str(),
                csv_field(&r.incident_type),
                csv_field(&r.team),
                r.clients_affected,
                r.status,
                r.created_at.to_rfc3339(),
                r.resolved_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
                opt(r.resolution_time_h),
                r.sla_limit_h,
                r.meets_sla,
                opt(r.excess_h),
                r.penalty_usd
            ));
        }

        output
    }

    /// Continuity scenario table.
    pub fn scenarios_csv(records: &[ScenarioRecord]) -> String {
        let mut output = String::new();
        output.push_str(
            "scenario_id,disruption_type,probability,rto_objective_h,rpo_objective_h,\
             actual_rto_h,actual_rpo_h,meets_rto,meets_rpo,rto_gap_h,clients_affected,\
             financial_impact_usd,residual_risk_usd\n",
        );

        for r in records {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                csv_field(&r.scenario_id),
                csv_field(r.disruption_type.label()),
                r.probability,
                r.rto_objective_h,
                r.rpo_objective_h,
                opt(r.actual_rto_h),
                opt(r.actual_rpo_h),
                r.meets_rto,
                r.meets_rpo,
                opt(r.rto_gap_h),
                r.clients_affected,
                opt(r.financial_impact_usd),
                opt(r.residual_risk_usd)
            ));
        }

        output
    }

    /// Monthly availability table.
    pub fn availability_csv(records: &[AvailabilityRecord]) -> String {
        let mut output = String::new();
        output.push_str("month,uptime_pct,hours_down,minutes_down,meets_sla,financial_impact\n");

        for r in records {
            output.push_str(&format!(
                "{},{},{},{},{},{:.2}\n",
                csv_field(&r.month),
                r.uptime_pct,
                r.hours_down,
                r.minutes_down,
                r.meets_sla,
                r.financial_impact
            ));
        }

        output
    }

    /// Governance KPI table.
    pub fn kpis_csv(records: &[KPIRecord]) -> String {
        let mut output = String::new();
        output.push_str("name,framework,value,threshold,unit,higher_is_better,status,gap,gap_pct\n");

        for r in records {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                csv_field(&r.name),
                csv_field(&r.framework.to_string()),
                r.value,
                r.threshold,
                csv_field(&r.unit),
                r.higher_is_better,
                r.status,
                r.gap,
                r.gap_pct
            ));
        }

        output
    }

    /// Risk register table.
    pub fn risks_csv(records: &[RiskRecord]) -> String {
        let mut output = String::new();
        output.push_str(
            "risk_id,name,category,probability,impact_usd,inherent_risk_usd,controls,\
             control_effectiveness,residual_risk_usd,risk_level,exceeds_appetite\n",
        );

        for r in records {
            let controls: Vec<&str> = r.controls.iter().map(|c| c.name.as_str()).collect();
            output.push_str(&format!(
                "{},{},{},{},{:.2},{:.2},{},{},{:.2},{},{}\n",
                csv_field(&r.risk_id),
                csv_field(&r.name),
                csv_field(&r.category),
                r.probability,
                r.impact_usd,
                r.inherent_risk_usd,
                csv_field(&controls.join("; ")),
                r.control_effectiveness,
                r.residual_risk_usd,
                r.risk_level,
                r.exceeds_appetite
            ));
        }

        output
    }

    /// Write every artifact under `dir`. Returns the written paths.
    pub fn write_all(report: &IntegratedReport, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let json = Self::to_json(report)?;
        let digest = Hash256::digest(json.as_bytes());

        let artifacts = [
            ("integrated_report.txt", Self::to_text(report)),
            ("integrated_report.sha3", format!("{}  integrated_report.json\n", digest)),
            ("incidents.csv", Self::incidents_csv(&report.incidents)),
            ("continuity_scenarios.csv", Self::scenarios_csv(&report.scenarios)),
            ("risk_register.csv", Self::risks_csv(&report.risks)),
            ("availability_months.csv", Self::availability_csv(&report.availability_months)),
            ("governance_kpis.csv", Self::kpis_csv(&report.governance.kpis)),
            ("integrated_report.json", json),
        ];

        let mut written = Vec::with_capacity(artifacts.len());
        for (name, contents) in artifacts {
            let path = dir.join(name);
            fs::write(&path, contents)?;
            written.push(path);
        }

        info!(
            dir = %dir.display(),
            files = written.len(),
            digest = %digest,
            "Report written"
        );
        Ok(written)
    }
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Incident, Risk};
    use crate::governance::GovernanceDashboard;
    use crate::governance::KPI;
    use crate::sla::SLAEvaluator;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::tempdir;

    fn sample() -> IntegratedReport {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut a = Incident::new("INC-2024-001", "Billing", Severity::High, t0)
            .with_type("Database error, replica lag")
            .with_team("Infrastructure");
        a.resolve(t0 + Duration::hours(6)).unwrap();
        let b = Incident::new("INC-2024-002", "Billing", Severity::Low, t0);
        let incidents = vec![a, b];

        let mut evaluator = SLAEvaluator::new();
        let sla = evaluator.evaluate_batch(&incidents);
        let sla_by_severity = evaluator.compliance_by_severity(&incidents);

        let mut risk = Risk::new("R-01", "Ransomware", "Security", 0.08, 295_000.0).unwrap();
        risk.add_control("Immutable backups", 0.55).unwrap();

        let mut dashboard = GovernanceDashboard::new("2024");
        dashboard.add_kpi(KPI::new("SLA compliance", sla.compliance_rate_pct, 90.0));

        IntegratedReport::assemble(ReportInput {
            seed: 42,
            period: "2024".to_string(),
            incidents: incidents.iter().map(|i| i.to_record()).collect(),
            sla,
            sla_by_severity,
            availability_months: Vec::new(),
            availability: None,
            direct_availability_pct: 100.0,
            services: Vec::new(),
            services_availability: Vec::new(),
            governance: dashboard.to_record(),
            risks: vec![risk.to_record()],
            scenarios: Vec::new(),
            continuity: None,
        })
    }

    #[test]
    fn test_assemble() {
        let report = sample();
        assert_eq!(report.incidents.len(), 2);
        assert_eq!(report.total_residual_risk_usd, 10_620.0);
        assert_eq!(report.sla.total_incidents, 2);
        assert_eq!(report.maturity.score, 0);
        assert!(Uuid::parse_str(&report.run_id).is_ok());
    }

    #[test]
    fn test_text_sections() {
        let text = ReportGenerator::to_text(&sample());
        assert!(text.contains("[ITIL 4] Incident management"));
        assert!(text.contains("No availability periods recorded"));
        assert!(text.contains("No continuity scenarios run"));
        assert!(text.contains("INTEGRATED MATURITY: 0/5 - Non-existent"));
        assert!(text.contains("[R-01] Ransomware"));
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample();
        let json = ReportGenerator::to_json(&report).unwrap();
        let parsed: IntegratedReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.sla.compliant, report.sla.compliant);
        assert_eq!(parsed.sla.sla_status, report.sla.sla_status);
        assert_eq!(
            parsed.sla_by_severity.keys().collect::<Vec<_>>(),
            report.sla_by_severity.keys().collect::<Vec<_>>()
        );
        for (a, b) in parsed.incidents.iter().zip(&report.incidents) {
            assert_eq!(a.incident_id, b.incident_id);
            assert_eq!(a.status, b.status);
            assert_eq!(a.derive_meets_sla(), b.meets_sla);
        }
    }

    #[test]
    fn test_digest_stable() {
        let report = sample();
        let a = ReportGenerator::digest(&report).unwrap();
        let b = ReportGenerator::digest(&report).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 64);
    }

    #[test]
    fn test_csv_quoting() {
        let report = sample();
        let csv = ReportGenerator::incidents_csv(&report.incidents);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"Database error, replica lag\""));
        // Unresolved incident leaves the optional columns empty
        assert!(lines[2].contains(",,"));

        let risks = ReportGenerator::risks_csv(&report.risks);
        assert!(risks.lines().nth(1).unwrap().starts_with("R-01,Ransomware,Security,0.08"));
    }

    #[test]
    fn test_availability_and_kpi_csv() {
        let months = vec![AvailabilityRecord {
            month: "Jan".to_string(),
            uptime_pct: 99.5,
            hours_down: 3.65,
            minutes_down: 219.0,
            meets_sla: false,
            financial_impact: 18_250.0,
        }];
        let csv = ReportGenerator::availability_csv(&months);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("month,uptime_pct"));
        assert_eq!(lines[1], "Jan,99.5,3.65,219,false,18250.00");

        let report = sample();
        let csv = ReportGenerator::kpis_csv(&report.governance.kpis);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("SLA compliance,"));
        assert!(lines[1].contains(",ALERT,"));
    }

    #[test]
    fn test_text_direct_availability() {
        let mut report = sample();
        report.direct_availability_pct = 99.7222;
        report.services_availability.push(ServiceAvailability {
            service_id: "SVC-001".to_string(),
            availability_pct: 99.75,
            meets_sla: false,
            financial_impact: 1_200.0,
        });
        let text = ReportGenerator::to_text(&report);
        assert!(text.contains("Direct measurement:    99.7222%"));
        assert!(text.contains("SVC-001"));
        assert!(text.contains("99.7500% (below target) $1200.00"));
    }

    #[test]
    fn test_render_formats() {
        let report = sample();
        let csv = ReportGenerator::render(&report, ExportFormat::Csv).unwrap();
        assert!(csv.starts_with("incident_id,"));
        let json = ReportGenerator::render(&report, ExportFormat::Json).unwrap();
        assert!(json.contains("\"run_id\""));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_write_all() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("outputs");
        let report = sample();

        let written = ReportGenerator::write_all(&report, &out).unwrap();
        assert_eq!(written.len(), 8);
        for path in &written {
            assert!(path.exists());
        }

        let json = fs::read_to_string(out.join("integrated_report.json")).unwrap();
        let sha = fs::read_to_string(out.join("integrated_report.sha3")).unwrap();
        assert!(sha.starts_with(&Hash256::digest(json.as_bytes()).to_hex()));
    }
}
