//! Model configuration.
//!
//! Thresholds and run parameters shared by every evaluator.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Report years accepted by [`ModelConfig::validate`].
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1970..=9999;

/// Configuration for a compliance run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Seed for the fixture generator
    pub seed: u64,
    /// Number of incidents to simulate
    pub incident_count: usize,
    /// Year used in incident identifiers
    pub year: i32,
    /// Governance period label
    pub period: String,
    /// SLA batch compliance target (%)
    pub sla_target_pct: f64,
    /// Availability SLA target (%)
    pub availability_target_pct: f64,
    /// Average hours per month
    pub hours_per_month: f64,
    /// RTO ceiling for the recovery simulator (hours)
    pub rto_hours: f64,
    /// KPI alerts tolerated before governance is non-compliant
    pub max_alerts_tolerated: usize,
    /// Directory for written reports
    pub output_dir: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            incident_count: 15,
            year: 2024,
            period: "2024".to_string(),
            sla_target_pct: 95.0,
            availability_target_pct: 99.9,
            hours_per_month: 730.0,
            rto_hours: 4.0,
            max_alerts_tolerated: 1,
            output_dir: PathBuf::from("outputs"),
        }
    }
}

impl ModelConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Reject configurations that would make the model meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.incident_count == 0 {
            return Err(Error::Config("incident_count must be positive".into()));
        }
        if !YEAR_RANGE.contains(&self.year) {
            return Err(Error::Config(format!(
                "year {} outside {}..={}",
                self.year,
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            )));
        }
        if self.hours_per_month <= 0.0 {
            return Err(Error::Config("hours_per_month must be positive".into()));
        }
        if self.rto_hours <= 0.0 {
            return Err(Error::Config("rto_hours must be positive".into()));
        }
        for (name, pct) in [
            ("sla_target_pct", self.sla_target_pct),
            ("availability_target_pct", self.availability_target_pct),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(Error::Config(format!("{} must be within 0..=100", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.incident_count, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 7, "rto_hours": 2.5}}"#).unwrap();

        let config = ModelConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.rto_hours, 2.5);
        assert_eq!(config.incident_count, 15);
    }

    #[test]
    fn test_year_out_of_range() {
        for year in [1969, 10_000, i32::MAX] {
            let config = ModelConfig {
                year,
                ..ModelConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::Config(_))));
        }
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"incident_count": 0}}"#).unwrap();
        assert!(matches!(
            ModelConfig::from_file(file.path()),
            Err(Error::Config(_))
        ));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "not json").unwrap();
        assert!(ModelConfig::from_file(broken.path()).is_err());
    }
}
