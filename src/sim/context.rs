use rand::RngCore;

use crate::content::{EventEffects, GameConfig};
use crate::model::{EntityId, Timestamp};
use crate::notify::Notifier;
use crate::sim::ticks::ticks_passed;
use crate::store::RecordStore;

/// Everything a core operation needs, bundled so signatures stay stable.
///
/// Used both by the tick driver and by the command layer between ticks.
pub struct TickContext<'a> {
    pub store: &'a mut dyn RecordStore,
    pub content: &'a GameConfig,
    pub rng: &'a mut dyn RngCore,
    pub notifier: &'a dyn Notifier,
    /// Combined multipliers of the active world events.
    pub modifiers: &'a EventEffects,
    pub now: Timestamp,
}

impl TickContext<'_> {
    /// Whole ticks elapsed since `start`.
    pub fn ticks_since(&self, start: Timestamp) -> u64 {
        ticks_passed(start, self.now, self.content.tick.tick_seconds)
    }

    /// Instant `ticks` ticks from now.
    pub fn after_ticks(&self, ticks: u64) -> Timestamp {
        self.now.plus_ticks(ticks, self.content.tick.tick_seconds)
    }

    /// Instant `ticks` ticks ago.
    pub fn before_ticks(&self, ticks: u64) -> Timestamp {
        let secs = ticks.saturating_mul(self.content.tick.tick_seconds);
        self.now.plus_secs(-i64::try_from(secs).unwrap_or(i64::MAX))
    }

    pub fn notify(&self, entity: EntityId, text: &str) {
        self.notifier.notify(entity, text);
    }

    pub fn entity_name(&self, id: EntityId) -> String {
        self.store
            .entity(id)
            .map_or_else(|| format!("#{id}"), |e| e.name.clone())
    }
}
