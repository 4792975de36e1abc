use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::Timestamp;

/// Whole ticks elapsed between `start` and `now`. Zero when `now` precedes `start`.
pub fn ticks_passed(start: Timestamp, now: Timestamp, tick_seconds: u64) -> u64 {
    let elapsed = now - start;
    if elapsed <= 0 || tick_seconds == 0 {
        return 0;
    }
    elapsed as u64 / tick_seconds
}

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Timestamp::from_secs(i64::try_from(secs).unwrap_or(i64::MAX))
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            secs: AtomicI64::new(start.as_secs()),
        }
    }

    pub fn set(&self, at: Timestamp) {
        self.secs.store(at.as_secs(), Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_secs(self.secs.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_partial_ticks() {
        let start = Timestamp::from_secs(1_000);
        assert_eq!(ticks_passed(start, Timestamp::from_secs(1_059), 60), 0);
        assert_eq!(ticks_passed(start, Timestamp::from_secs(1_060), 60), 1);
        assert_eq!(ticks_passed(start, Timestamp::from_secs(1_179), 60), 1);
    }

    #[test]
    fn clock_skew_yields_zero() {
        assert_eq!(
            ticks_passed(Timestamp::from_secs(500), Timestamp::from_secs(100), 60),
            0
        );
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(Timestamp::from_secs(10));
        clock.advance_secs(50);
        assert_eq!(clock.now(), Timestamp::from_secs(60));
        clock.set(Timestamp::from_secs(5));
        assert_eq!(clock.now().as_secs(), 5);
    }
}
