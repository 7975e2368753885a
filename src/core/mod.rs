//! Core utilities and common types for CloudCore.

pub mod config;
pub mod error;
pub mod types;

pub use config::ModelConfig;
pub use error::{ensure_range, Error, Result};
pub use types::*;
