//! Monitoring Module
//!
//! Provides observability for CloudCore:
//! - Structured logging via `tracing-subscriber`

pub mod logging;

pub use logging::{init_logging, LogLevel, LoggingConfig};
