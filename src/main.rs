//! CloudCore CLI
//!
//! Runs the integrated compliance model and prints or writes its report.

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{ArgAction, Parser, Subcommand};
use cloudcore::availability::{AvailabilityManager, DEFAULT_AVAILABILITY_TARGET_PCT};
use cloudcore::continuity::{RecoverySimulator, RecoveryVerdict};
use cloudcore::domain::{Incident, IncidentRecord, Severity};
use cloudcore::fixtures::{base_time, BILLING_SERVICE};
use cloudcore::monitoring::{init_logging, LogLevel, LoggingConfig};
use cloudcore::report::{ExportFormat, ReportGenerator};
use cloudcore::sla::{SLAEvaluator, SLAVerdict};
use cloudcore::{pipeline, ModelConfig};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cloudcore")]
#[command(version)]
#[command(about = "Integrated ITIL 4 / ISO 20000 / COBIT 2019 / ISO 22301 compliance model", long_about = None)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the generator seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format (text, json, csv)
    #[arg(long, default_value = "text", global = true)]
    format: ExportFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full model and print the integrated report
    Run {
        /// Number of incidents to simulate
        #[arg(long)]
        incidents: Option<usize>,

        /// Also write every artifact to this directory
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Write artifacts to the configured output directory
        #[arg(short, long)]
        write: bool,
    },

    /// Run the three single-value checks
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = if cli.log_json {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    };
    init_logging(&logging.with_level(LogLevel::from_verbosity(cli.verbose)))?;

    let mut config = match &cli.config {
        Some(path) => ModelConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ModelConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    match cli.command {
        Commands::Run {
            incidents,
            output_dir,
            write,
        } => {
            if let Some(count) = incidents {
                config.incident_count = count;
            }
            let write = write || output_dir.is_some();
            if let Some(dir) = output_dir {
                config = config.with_output_dir(dir);
            }
            run(&config, cli.format, write)
        }
        Commands::Demo => demo(cli.format),
    }
}

fn run(config: &ModelConfig, format: ExportFormat, write: bool) -> Result<()> {
    let report = pipeline::run(config).context("compliance run failed")?;
    println!("{}", ReportGenerator::render(&report, format)?);

    if write {
        let written = ReportGenerator::write_all(&report, &config.output_dir)
            .with_context(|| format!("writing to {}", config.output_dir.display()))?;
        for path in written {
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct DemoOutcome {
    incident: IncidentRecord,
    sla_verdict: SLAVerdict,
    availability_pct: f64,
    availability_meets_sla: bool,
    recoveries: Vec<RecoveryCheck>,
}

#[derive(Serialize)]
struct RecoveryCheck {
    minutes: f64,
    rto_minutes: f64,
    verdict: RecoveryVerdict,
}

fn demo(format: ExportFormat) -> Result<()> {
    let created = base_time(2024)?;
    let mut incident = Incident::new("INC-DEMO-001", BILLING_SERVICE, Severity::High, created)
        .with_type("Demo")
        .with_team("Team Alpha")
        .with_clients(100);
    incident.resolve(created + Duration::minutes(3))?;
    let sla_verdict = SLAEvaluator::new().evaluate(&incident);

    let mut availability = AvailabilityManager::new(Some(43_200.0));
    availability.register_downtime(120.0);

    let simulator = RecoverySimulator::from_minutes(60.0);
    let recoveries = [45.0, 90.0]
        .into_iter()
        .map(|minutes| RecoveryCheck {
            minutes,
            rto_minutes: simulator.rto_hours() * 60.0,
            verdict: simulator.simulate_recovery(minutes),
        })
        .collect();

    let outcome = DemoOutcome {
        incident: incident.to_record(),
        sla_verdict,
        availability_pct: availability.calculate_availability(),
        availability_meets_sla: availability.evaluate_sla(DEFAULT_AVAILABILITY_TARGET_PCT),
        recoveries,
    };

    match format {
        ExportFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => {
            println!("Demo SLA: {} -> {}", incident, outcome.sla_verdict);
            println!(
                "Demo availability: {:.4}% ({})",
                outcome.availability_pct,
                if outcome.availability_meets_sla { "meets target" } else { "below target" }
            );
            for check in &outcome.recoveries {
                println!(
                    "Demo recovery ({} min vs {} min): {}",
                    check.minutes, check.rto_minutes, check.verdict
                );
            }
        }
    }
    Ok(())
}
