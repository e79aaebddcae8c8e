//! Timestamp type used throughout the platform.
//!
//! Timestamps are Unix epoch seconds (UTC).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs` (saturating).
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// This timestamp shifted forward by whole days (saturating).
    pub fn plus_days(&self, days: u64) -> Self {
        self.plus_secs(days * 86_400)
    }

    /// Whether this timestamp is strictly before `now`.
    pub fn is_past(&self, now: Timestamp) -> bool {
        *self < now
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_days_adds_whole_days() {
        let t = Timestamp::new(1_000);
        assert_eq!(t.plus_days(90).as_secs(), 1_000 + 90 * 86_400);
    }

    #[test]
    fn is_past_is_strict() {
        let t = Timestamp::new(100);
        assert!(!t.is_past(Timestamp::new(100)));
        assert!(t.is_past(Timestamp::new(101)));
        assert!(!t.is_past(Timestamp::new(99)));
    }
}
