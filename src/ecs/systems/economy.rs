//! Stat recompute, growth/production/upkeep, and periodic prestige.

use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use super::TickEnv;
use crate::ecs::conditions::prestige_due;
use crate::ecs::resources::{Content, JobsRng, SharedStore};
use crate::ecs::schedule::{TickPhase, WorldTick};
use crate::sim::{recompute_all, run_economy, update_prestige};

pub fn add_economy_systems(app: &mut App) {
    app.add_systems(WorldTick, recompute_stats.in_set(TickPhase::Stats));
    app.add_systems(WorldTick, grow_and_upkeep.in_set(TickPhase::Economy));
    app.add_systems(
        WorldTick,
        refresh_prestige
            .run_if(prestige_due)
            .in_set(TickPhase::Prestige),
    );
}

/// Full, idempotent recompute from owned buildings.
fn recompute_stats(store: Res<SharedStore>, content: Res<Content>) {
    recompute_all(&mut *store.0.lock(), &content.0);
}

fn grow_and_upkeep(env: TickEnv, mut rng: ResMut<JobsRng>) {
    env.run(&mut rng.0, run_economy);
}

fn refresh_prestige(env: TickEnv, mut rng: ResMut<JobsRng>) {
    env.run(&mut rng.0, update_prestige);
    tracing::debug!(category = "WORLD", tick = env.tick(), "prestige refreshed");
}
