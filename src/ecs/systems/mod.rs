//! Tick systems. Each phase system locks the shared store once and runs the
//! matching core operation against a `TickContext`.

pub mod checkpoint;
pub mod combat;
pub mod economy;
pub mod events;
pub mod jobs;
pub mod npc;

use bevy_ecs::system::{Res, SystemParam};
use rand::RngCore;

use crate::ecs::clock::WorldClock;
use crate::ecs::resources::{Content, Notifications, SharedStore, WorldEvents};
use crate::sim::TickContext;

/// Shared read-only resources every phase system needs.
#[derive(SystemParam)]
pub struct TickEnv<'w> {
    store: Res<'w, SharedStore>,
    content: Res<'w, Content>,
    notifier: Res<'w, Notifications>,
    events: Res<'w, WorldEvents>,
    clock: Res<'w, WorldClock>,
}

impl TickEnv<'_> {
    pub fn tick(&self) -> u64 {
        self.clock.tick_count
    }

    /// Hold the store lock for the whole call so no command observes a
    /// half-applied phase.
    pub fn run<R>(&self, rng: &mut dyn RngCore, f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
        let content = &self.content.0;
        let modifiers = self.events.0.read().modifiers(&content.world_events);
        let mut store = self.store.0.lock();
        let mut ctx = TickContext {
            store: &mut *store,
            content,
            rng,
            notifier: self.notifier.0.as_ref(),
            modifiers: &modifiers,
            now: self.clock.now,
        };
        f(&mut ctx)
    }
}
