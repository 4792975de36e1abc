pub mod rng;
pub mod world;

pub use rng::{
    CombatRng, EspionageRng, EventsRng, JobsRng, NpcRng, WorldSeed, derive_domain_seed,
    distribute_rng,
};
pub use world::{
    Content, NpcCooldowns, Notifications, SharedEvents, SharedStore, TickSummary, WorldConfig,
    WorldEvents,
};
