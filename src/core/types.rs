//! Common types used across CloudCore modules.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

/// A SHA3-256 digest of a rendered report.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Hash arbitrary bytes.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(data);
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&hasher.finalize());
        Self(arr)
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Hours elapsed between two timestamps, with sub-second precision.
pub fn hours_between(start: Timestamp, end: Timestamp) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 3_600_000_000.0,
        None => delta.num_seconds() as f64 / 3600.0,
    }
}

/// Duration of `h` hours, at millisecond precision.
pub fn duration_from_hours(h: f64) -> chrono::Duration {
    chrono::Duration::milliseconds((h * 3_600_000.0).round() as i64)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(99.722_222, 4), 99.7222);
        assert_eq!(round_to(10_620.000_000_000_002, 2), 10_620.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn test_hours_between() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let end = start + Duration::minutes(90);
        assert!((hours_between(start, end) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_duration_from_hours() {
        assert_eq!(duration_from_hours(1.5), Duration::minutes(90));
        assert_eq!(duration_from_hours(0.0), Duration::zero());
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + duration_from_hours(4.526);
        assert!((hours_between(start, end) - 4.526).abs() < 1e-6);
    }

    #[test]
    fn test_digest_is_stable() {
        let a = Hash256::digest(b"cloudcore");
        let b = Hash256::digest(b"cloudcore");
        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 64);
        assert_ne!(a, Hash256::digest(b"cloudcore "));
    }
}
