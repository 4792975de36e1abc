use std::sync::Arc;

use bevy_app::App;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::clock::{WorldClock, stamp_clock};
use super::plugin::WorldPlugin;
use super::resources::{
    CombatRng, Content, EspionageRng, EventsRng, JobsRng, Notifications, NpcCooldowns, NpcRng,
    SharedEvents, SharedStore, TickSummary, WorldConfig, WorldEvents, WorldSeed, distribute_rng,
};
use super::schedule::{TickPhase, WorldTick, configure_world_schedule};
use super::systems::checkpoint::reset_summary;
use crate::content::GameConfig;
use crate::notify::Notifier;
use crate::sim::Clock;
use crate::store::StoreHandle;

/// External collaborators the tick driver works against.
#[derive(Clone)]
pub struct WorldDeps {
    pub store: StoreHandle,
    pub content: Arc<GameConfig>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
    /// Shared with the command layer so player trades see event prices.
    pub events: SharedEvents,
}

/// Build a headless Bevy app with the world clock, shared collaborators,
/// per-domain RNGs and every tick system.
///
/// The executor is single-threaded: every phase locks the same store, and
/// a fixed order keeps a seeded world reproducible.
///
/// Manual tick control:
/// ```no_run
/// # use city_sim::ecs::{build_world_app, run_tick};
/// # fn demo(deps: city_sim::ecs::WorldDeps) {
/// let mut app = build_world_app(deps, Default::default());
/// for _ in 0..60 {
///     run_tick(&mut app);
/// }
/// # }
/// ```
pub fn build_world_app(deps: WorldDeps, config: WorldConfig) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(WorldClock::new(deps.clock));
    app.insert_resource(SharedStore(deps.store));
    app.insert_resource(Content(deps.content));
    app.insert_resource(Notifications(deps.notifier));
    app.insert_resource(WorldEvents(deps.events));
    app.insert_resource(WorldSeed(config.seed));
    app.insert_resource(config);
    app.init_resource::<NpcCooldowns>();
    app.init_resource::<TickSummary>();

    // Per-domain RNG resources (reseeded each tick by distribute_rng)
    app.init_resource::<JobsRng>();
    app.init_resource::<EspionageRng>();
    app.init_resource::<CombatRng>();
    app.init_resource::<EventsRng>();
    app.init_resource::<NpcRng>();

    let mut schedule = configure_world_schedule(ExecutorKind::SingleThreaded);
    schedule.add_systems(
        (reset_summary, distribute_rng)
            .chain()
            .after(stamp_clock)
            .in_set(TickPhase::Begin),
    );
    app.add_schedule(schedule);
    app.add_plugins(WorldPlugin);
    app
}

/// Run one full world tick.
pub fn run_tick(app: &mut App) {
    app.world_mut().run_schedule(WorldTick);
}
