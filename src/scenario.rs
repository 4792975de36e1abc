//! Builder for hand-assembled worlds.
//!
//! Used by tests and by tools that need a small, exact starting state instead
//! of freshly founded cities.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::content::{EventEffects, GameConfig};
use crate::model::{Entity, EntityId, EntityKind, Personality, Timestamp, WarId};
use crate::notify::MemoryNotifier;
use crate::sim::npc::traits::seed_state;
use crate::sim::{TickContext, found_city, recompute_stats, set_trust};
use crate::store::{MemoryStore, RecordStore};

/// Arbitrary but fixed starting instant, far enough from zero that
/// `before_ticks` windows never underflow in tests.
pub const SCENARIO_START: Timestamp = Timestamp::from_secs(1_000_000);

/// Typed reference to a city in a [`Scenario`], enabling chained field mutation.
///
/// Created by [`Scenario::city`], [`Scenario::npc`] or [`Scenario::city_mut`].
/// Call [`.id()`](CityRef::id) to terminate the chain.
pub struct CityRef<'a> {
    scenario: &'a mut Scenario,
    id: EntityId,
}

impl CityRef<'_> {
    fn entity_mut(&mut self) -> &mut Entity {
        self.scenario
            .store
            .entity_mut(self.id)
            .expect("scenario city exists")
    }

    pub fn troops(mut self, v: u32) -> Self { self.entity_mut().troops = v; self }
    pub fn max_troops(mut self, v: u32) -> Self { self.entity_mut().max_troops = v; self }
    pub fn spies(mut self, v: u32) -> Self { self.entity_mut().spies = v; self }
    pub fn population(mut self, v: u32) -> Self { self.entity_mut().population = v; self }
    pub fn max_population(mut self, v: u32) -> Self { self.entity_mut().max_population = v; self }
    pub fn battles_won(mut self, v: u32) -> Self { self.entity_mut().battles_won = v; self }
    pub fn prestige(mut self, v: f64) -> Self { self.entity_mut().prestige = v; self }

    pub fn resource(mut self, name: &str, amount: f64) -> Self {
        self.entity_mut().resources.set(name, amount);
        self
    }

    pub fn building(mut self, name: &str, level: u32) -> Self {
        self.entity_mut().buildings.insert(name.to_string(), level);
        self
    }

    /// Derive stats from the buildings set so far. Capacities set explicitly
    /// afterwards still win.
    pub fn derive_stats(mut self) -> Self {
        let content = self.scenario.content.clone();
        recompute_stats(self.entity_mut(), &content);
        self
    }

    /// Escape hatch: apply an arbitrary closure to the entity.
    pub fn with(mut self, f: impl FnOnce(&mut Entity)) -> Self {
        f(self.entity_mut());
        self
    }

    pub fn id(self) -> EntityId {
        self.id
    }
}

pub struct Scenario {
    content: GameConfig,
    store: MemoryStore,
    notifier: MemoryNotifier,
    rng: SmallRng,
    modifiers: EventEffects,
    now: Timestamp,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    pub fn new() -> Self {
        Self::with_content(GameConfig::standard())
    }

    pub fn with_content(content: GameConfig) -> Self {
        Self {
            content,
            store: MemoryStore::new(),
            notifier: MemoryNotifier::new(),
            rng: SmallRng::seed_from_u64(42),
            modifiers: EventEffects::default(),
            now: SCENARIO_START,
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn content(&self) -> &GameConfig {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut GameConfig {
        &mut self.content
    }

    /// Override the world-event multipliers seen by [`run`](Self::run).
    pub fn modifiers(&mut self, modifiers: EventEffects) {
        self.modifiers = modifiers;
    }

    // -- Entities --

    /// A bare player city: no troops, resources or buildings.
    pub fn city(&mut self, name: &str) -> CityRef<'_> {
        let id = self.store.create_entity(EntityKind::Player, name);
        self.touch(id);
        CityRef { scenario: self, id }
    }

    /// A bare NPC city with its personality baseline.
    pub fn npc(&mut self, name: &str, personality: Personality) -> CityRef<'_> {
        let id = self.store.create_entity(EntityKind::Npc, name);
        let state = seed_state(personality, &self.content);
        if let Some(entity) = self.store.entity_mut(id) {
            entity.npc = Some(state);
        }
        self.touch(id);
        CityRef { scenario: self, id }
    }

    /// A city with the configured starting package.
    pub fn founded(&mut self, kind: EntityKind, name: &str) -> EntityId {
        found_city(&mut self.store, &self.content, kind, name, self.now)
    }

    pub fn city_mut(&mut self, id: EntityId) -> CityRef<'_> {
        CityRef { scenario: self, id }
    }

    fn touch(&mut self, id: EntityId) {
        let now = self.now;
        if let Some(entity) = self.store.entity_mut(id) {
            entity.last_active = now;
        }
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        self.store.entity(id).expect("scenario entity exists")
    }

    // -- Relations --

    pub fn war(&mut self, attacker: EntityId, defender: EntityId) -> WarId {
        self.store
            .insert_war(attacker, defender, self.now)
            .expect("pair not already at war")
    }

    pub fn trust(&mut self, a: EntityId, b: EntityId, value: i32) {
        set_trust(&mut self.store, a, b, value);
    }

    pub fn supply(&mut self, resource: &str, amount: f64) {
        self.store.set_market_supply(resource, amount);
    }

    // -- Time --

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn advance_ticks(&mut self, ticks: u64) {
        self.now = self.now.plus_ticks(ticks, self.content.tick.tick_seconds);
    }

    pub fn advance_secs(&mut self, secs: i64) {
        self.now = self.now.plus_secs(secs);
    }

    // -- Execution --

    /// Run `f` against a context stamped with the scenario's current time.
    pub fn run<R>(&mut self, f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
        let mut ctx = TickContext {
            store: &mut self.store,
            content: &self.content,
            rng: &mut self.rng,
            notifier: &self.notifier,
            modifiers: &self.modifiers,
            now: self.now,
        };
        f(&mut ctx)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.store
    }

    pub fn notifier(&self) -> &MemoryNotifier {
        &self.notifier
    }

    pub fn into_store(self) -> MemoryStore {
        self.store
    }
}
