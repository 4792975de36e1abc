use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ResMut;

use super::TickEnv;
use crate::ecs::resources::{NpcCooldowns, NpcRng, TickSummary, distribute_rng};
use crate::ecs::schedule::{TickPhase, WorldTick};
use crate::sim::{ensure_npcs, run_npc_tick};

pub fn add_npc_systems(app: &mut App) {
    app.add_systems(
        WorldTick,
        bootstrap_npcs.after(distribute_rng).in_set(TickPhase::Begin),
    );
    app.add_systems(WorldTick, run_npcs.in_set(TickPhase::Npc));
}

/// Top the NPC population up to the configured count.
fn bootstrap_npcs(env: TickEnv, mut rng: ResMut<NpcRng>, mut summary: ResMut<TickSummary>) {
    let created = env.run(&mut rng.0, ensure_npcs);
    summary.npcs_created += created.len();
}

fn run_npcs(
    env: TickEnv,
    mut rng: ResMut<NpcRng>,
    mut cooldowns: ResMut<NpcCooldowns>,
    mut summary: ResMut<TickSummary>,
) {
    let tick = env.tick();
    let report = env.run(&mut rng.0, |ctx| run_npc_tick(ctx, &mut cooldowns.0, tick));
    summary.npcs_awake = report.awake;
    summary.npcs_asleep = report.asleep;
    summary.npc_actions = report.actions.len();
}
