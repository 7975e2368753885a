//! Error types for CloudCore.

use thiserror::Error;

/// Result type alias for CloudCore operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in CloudCore operations.
#[derive(Error, Debug)]
pub enum Error {
    // Input validation errors
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid time range for {0}: end precedes start")]
    InvalidTimeRange(String),

    // Lifecycle errors
    #[error("Invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: String,
        to: String,
    },

    #[error("Incident closed: {0}")]
    IncidentClosed(String),

    // Fixture errors
    #[error("Invalid fixture weights: {0}")]
    InvalidWeights(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<rand::distributions::WeightedError> for Error {
    fn from(err: rand::distributions::WeightedError) -> Self {
        Error::InvalidWeights(err.to_string())
    }
}

/// Check that `value` lies in `min..=max`.
pub fn ensure_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(Error::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
