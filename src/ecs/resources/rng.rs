use std::hash::{DefaultHasher, Hash, Hasher};

use bevy_ecs::resource::Resource;
use bevy_ecs::world::World;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::ecs::clock::WorldClock;

/// Seed every per-domain RNG is derived from.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldSeed(pub u64);

macro_rules! domain_rng {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Resource)]
        pub struct $name(pub SmallRng);

        impl Default for $name {
            fn default() -> Self {
                Self(SmallRng::seed_from_u64(0))
            }
        }
    };
}

domain_rng!(JobsRng, "Per-domain RNG for construction and training sweeps.");
domain_rng!(EspionageRng, "Per-domain RNG for mission resolution.");
domain_rng!(CombatRng, "Per-domain RNG for battle jitter and loot.");
domain_rng!(EventsRng, "Per-domain RNG for world and random events.");
domain_rng!(NpcRng, "Per-domain RNG for NPC decisions.");

/// Deterministic per-domain seed from the world seed, domain name and tick.
pub fn derive_domain_seed(seed: u64, domain: &str, tick: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    domain.hash(&mut hasher);
    tick.hash(&mut hasher);
    hasher.finish()
}

/// Exclusive system that re-seeds all per-domain RNGs each tick.
/// Runs in `TickPhase::Begin` before any domain system.
pub fn distribute_rng(world: &mut World) {
    let seed = world.resource::<WorldSeed>().0;
    let tick = world.resource::<WorldClock>().tick_count;

    macro_rules! reseed {
        ($res:ty, $label:expr) => {
            world.resource_mut::<$res>().0 =
                SmallRng::seed_from_u64(derive_domain_seed(seed, $label, tick));
        };
    }

    reseed!(JobsRng, "jobs");
    reseed!(EspionageRng, "espionage");
    reseed!(CombatRng, "combat");
    reseed!(EventsRng, "events");
    reseed!(NpcRng, "npc");
}
