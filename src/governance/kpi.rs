//! Key performance indicators for the IT governance committee.

use crate::core::round_to;
use serde::{Deserialize, Serialize};

/// Framework that owns an indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    /// ITIL 4
    Itil4,
    /// ISO/IEC 20000
    Iso20000,
    /// COBIT 2019
    Cobit2019,
    /// ISO 22301
    Iso22301,
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Framework::Itil4 => write!(f, "ITIL 4"),
            Framework::Iso20000 => write!(f, "ISO/IEC 20000"),
            Framework::Cobit2019 => write!(f, "COBIT 2019"),
            Framework::Iso22301 => write!(f, "ISO 22301"),
        }
    }
}

/// Indicator status against its threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KPIStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ALERT")]
    Alert,
}

impl std::fmt::Display for KPIStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KPIStatus::Ok => write!(f, "OK"),
            KPIStatus::Alert => write!(f, "ALERT"),
        }
    }
}

/// A key performance indicator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KPI {
    /// Indicator name
    pub name: String,
    /// Measured value
    pub value: f64,
    /// Target threshold
    pub threshold: f64,
    /// Unit (%, u, ...)
    pub unit: String,
    /// Owning framework
    pub framework: Framework,
    /// Polarity: values above the threshold are good
    pub higher_is_better: bool,
}

impl KPI {
    /// Create a higher-is-better percentage KPI owned by COBIT 2019.
    pub fn new(name: &str, value: f64, threshold: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            threshold,
            unit: "%".to_string(),
            framework: Framework::Cobit2019,
            higher_is_better: true,
        }
    }

    /// Set unit.
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    /// Set owning framework.
    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = framework;
        self
    }

    /// Flip polarity so that lower values are good.
    pub fn lower_is_better(mut self) -> Self {
        self.higher_is_better = false;
        self
    }

    pub fn status(&self) -> KPIStatus {
        let ok = if self.higher_is_better {
            self.value >= self.threshold
        } else {
            self.value <= self.threshold
        };
        if ok {
            KPIStatus::Ok
        } else {
            KPIStatus::Alert
        }
    }

    pub fn is_alert(&self) -> bool {
        self.status() == KPIStatus::Alert
    }

    /// value - threshold (4 decimals).
    pub fn gap(&self) -> f64 {
        round_to(self.value - self.threshold, 4)
    }

    /// Gap relative to the threshold (%); 0 for a zero threshold.
    pub fn gap_pct(&self) -> f64 {
        if self.threshold == 0.0 {
            return 0.0;
        }
        round_to(self.gap() / self.threshold * 100.0, 2)
    }

    pub fn to_record(&self) -> KPIRecord {
        KPIRecord {
            name: self.name.clone(),
            value: self.value,
            threshold: self.threshold,
            unit: self.unit.clone(),
            framework: self.framework,
            higher_is_better: self.higher_is_better,
            status: self.status(),
            gap: self.gap(),
            gap_pct: self.gap_pct(),
        }
    }
}

impl std::fmt::Display for KPI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<KPI '{}' | {}{} vs {}{} | {}>",
            self.name,
            self.value,
            self.unit,
            self.threshold,
            self.unit,
            self.status()
        )
    }
}

/// Flat KPI record for export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KPIRecord {
    pub name: String,
    pub value: f64,
    pub threshold: f64,
    pub unit: String,
    pub framework: Framework,
    pub higher_is_better: bool,
    pub status: KPIStatus,
    pub gap: f64,
    pub gap_pct: f64,
}
