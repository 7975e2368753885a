//! Availability Module
//!
//! Service availability management:
//! - Direct downtime accounting over a fixed period
//! - Monthly records and annual roll-up
//! - Monitored services

pub mod manager;

pub use manager::{
    AnnualAvailabilitySummary, AvailabilityManager, AvailabilityRecord, AvailabilityStatus,
    ServiceAvailability, DEFAULT_AVAILABILITY_TARGET_PCT, HOURS_PER_MONTH,
};
