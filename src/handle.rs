//! Command-layer entry points. Sessions call these between ticks; each call
//! holds the store lock for its whole validation-and-mutation sequence.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::content::GameConfig;
use crate::ecs::{SharedEvents, WorldDeps};
use crate::error::CommandError;
use crate::model::{
    AttackId, Entity, EntityId, EntityKind, JobId, JobPayload, SpyAction, TradeRecord, WarId,
};
use crate::notify::Notifier;
use crate::sim::{self, Clock, PeaceTerms, TickContext};
use crate::store::StoreHandle;

pub struct WorldHandle {
    store: StoreHandle,
    content: Arc<GameConfig>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    events: SharedEvents,
    rng: Mutex<SmallRng>,
}

impl WorldHandle {
    pub fn new(deps: &WorldDeps, seed: u64) -> Self {
        Self {
            store: deps.store.clone(),
            content: deps.content.clone(),
            clock: deps.clock.clone(),
            notifier: deps.notifier.clone(),
            events: deps.events.clone(),
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Run `f` against a context stamped with the current time.
    pub fn execute<R>(&self, f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
        let modifiers = self.events.read().modifiers(&self.content.world_events);
        let mut rng = self.rng.lock();
        let mut store = self.store.lock();
        let mut ctx = TickContext {
            store: &mut *store,
            content: &self.content,
            rng: &mut *rng,
            notifier: self.notifier.as_ref(),
            modifiers: &modifiers,
            now: self.clock.now(),
        };
        f(&mut ctx)
    }

    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.store.lock().entity(id).cloned()
    }

    /// The player's city, founded on first contact.
    pub fn join(&self, name: &str) -> EntityId {
        self.execute(|ctx| {
            if let Some(existing) = ctx.store.entity_by_name(name) {
                return existing.id;
            }
            sim::found_city(ctx.store, ctx.content, EntityKind::Player, name, ctx.now)
        })
    }

    pub fn train(&self, id: EntityId, amount: u32) -> Result<JobId, CommandError> {
        self.execute(|ctx| sim::schedule(ctx, id, JobPayload::Training { amount }))
    }

    pub fn build(&self, id: EntityId, building: &str) -> Result<JobId, CommandError> {
        let payload = JobPayload::Construction {
            building: building.to_string(),
        };
        self.execute(|ctx| sim::schedule(ctx, id, payload))
    }

    pub fn train_spies(&self, id: EntityId, amount: u32) -> Result<JobId, CommandError> {
        self.execute(|ctx| sim::schedule(ctx, id, JobPayload::SpyTraining { amount }))
    }

    pub fn launch_mission(
        &self,
        id: EntityId,
        action: SpyAction,
        target: EntityId,
    ) -> Result<JobId, CommandError> {
        self.execute(|ctx| sim::schedule(ctx, id, JobPayload::Espionage { action, target }))
    }

    pub fn declare_war(&self, id: EntityId, target: EntityId) -> Result<WarId, CommandError> {
        self.execute(|ctx| sim::declare_war(ctx, id, target))
    }

    pub fn make_peace(&self, id: EntityId, target: EntityId) -> Result<PeaceTerms, CommandError> {
        self.execute(|ctx| sim::end_war(ctx, id, target))
    }

    pub fn attack(
        &self,
        id: EntityId,
        target: EntityId,
        troops: u32,
    ) -> Result<AttackId, CommandError> {
        self.execute(|ctx| sim::schedule_attack(ctx, id, target, troops))
    }

    pub fn buy(&self, id: EntityId, resource: &str, quantity: f64) -> Result<TradeRecord, CommandError> {
        self.execute(|ctx| sim::buy(ctx, id, resource, quantity))
    }

    pub fn sell(&self, id: EntityId, resource: &str, quantity: f64) -> Result<TradeRecord, CommandError> {
        self.execute(|ctx| sim::sell(ctx, id, resource, quantity))
    }

    /// Admin override. Returns the clamped trust.
    pub fn set_trust(&self, a: EntityId, b: EntityId, value: i32) -> i32 {
        sim::set_trust(&mut *self.store.lock(), a, b, value)
    }

    pub fn prices(&self) -> BTreeMap<String, f64> {
        self.execute(|ctx| sim::price_table(ctx.store, ctx.content, ctx.modifiers))
    }
}
