pub mod app;
pub mod clock;
pub mod conditions;
pub mod plugin;
pub mod resources;
pub mod schedule;
pub mod server;
pub mod systems;

pub use app::{WorldDeps, build_world_app, run_tick};
pub use clock::WorldClock;
pub use conditions::{checkpoint_due, prestige_due};
pub use plugin::WorldPlugin;
pub use resources::{
    CombatRng, Content, EspionageRng, EventsRng, JobsRng, Notifications, NpcCooldowns, NpcRng,
    SharedEvents, SharedStore, TickSummary, WorldConfig, WorldEvents, WorldSeed,
};
pub use schedule::{TickPhase, WorldTick, configure_world_schedule};
pub use server::run_world_loop;
