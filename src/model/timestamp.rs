use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Wall-clock instant in whole seconds since the Unix epoch.
///
/// Every persisted start/end time uses this type. Natural ordering is chronological.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Timestamp `secs` seconds later (saturating).
    pub fn plus_secs(self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Timestamp `ticks` ticks of `tick_seconds` later.
    pub fn plus_ticks(self, ticks: u64, tick_seconds: u64) -> Self {
        let secs = ticks.saturating_mul(tick_seconds);
        self.plus_secs(i64::try_from(secs).unwrap_or(i64::MAX))
    }
}

impl Sub for Timestamp {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        self.0.saturating_sub(rhs.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_chronological() {
        assert!(Timestamp::from_secs(10) < Timestamp::from_secs(11));
    }

    #[test]
    fn plus_ticks_scales_by_tick_length() {
        let t = Timestamp::from_secs(100).plus_ticks(3, 60);
        assert_eq!(t.as_secs(), 280);
    }

    #[test]
    fn subtraction_yields_seconds() {
        assert_eq!(Timestamp::from_secs(50) - Timestamp::from_secs(20), 30);
        assert_eq!(Timestamp::from_secs(20) - Timestamp::from_secs(50), -30);
    }

    #[test]
    fn serializes_as_plain_integer() {
        let json = serde_json::to_string(&Timestamp::from_secs(42)).unwrap();
        assert_eq!(json, "42");
    }
}
