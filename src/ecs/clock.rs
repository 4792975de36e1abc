use std::sync::Arc;

use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use crate::model::Timestamp;
use crate::sim::Clock;

/// World clock resource: the time source, the instant stamped for the
/// running tick, and the number of completed ticks.
///
/// `stamp_clock` reads the source at the start of each tick so every phase
/// sees one consistent `now`; `advance_clock` counts the tick at the end.
#[derive(Resource)]
pub struct WorldClock {
    pub source: Arc<dyn Clock>,
    pub now: Timestamp,
    pub tick_count: u64,
}

impl WorldClock {
    pub fn new(source: Arc<dyn Clock>) -> Self {
        let now = source.now();
        Self {
            source,
            now,
            tick_count: 0,
        }
    }

    pub fn stamp(&mut self) {
        self.now = self.source.now();
    }

    pub fn advance(&mut self) {
        self.tick_count += 1;
    }
}

pub fn stamp_clock(mut clock: ResMut<WorldClock>) {
    clock.stamp();
}

/// Registered in `TickPhase::Last` so every other system sees the tick
/// number before it advances.
pub fn advance_clock(mut clock: ResMut<WorldClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ManualClock;

    #[test]
    fn stamp_reads_the_source() {
        let source = Arc::new(ManualClock::new(Timestamp::from_secs(100)));
        let mut clock = WorldClock::new(source.clone());
        assert_eq!(clock.now, Timestamp::from_secs(100));

        source.advance_secs(60);
        assert_eq!(clock.now, Timestamp::from_secs(100));
        clock.stamp();
        assert_eq!(clock.now, Timestamp::from_secs(160));
    }

    #[test]
    fn advance_counts_ticks() {
        let mut clock = WorldClock::new(Arc::new(ManualClock::new(Timestamp::from_secs(0))));
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick_count, 2);
    }
}
