use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ResMut;

use super::TickEnv;
use crate::ecs::resources::{CombatRng, TickSummary};
use crate::ecs::schedule::{TickPhase, WorldTick};
use crate::model::JobKind;
use crate::sim::sweep_due;

pub fn add_combat_systems(app: &mut App) {
    app.add_systems(WorldTick, resolve_due_attacks.in_set(TickPhase::Combat));
}

/// Resolve every attack whose travel time has elapsed.
fn resolve_due_attacks(env: TickEnv, mut rng: ResMut<CombatRng>, mut summary: ResMut<TickSummary>) {
    let report = env.run(&mut rng.0, |ctx| sweep_due(ctx, JobKind::Attack));
    summary.battles += report.completed;
    summary.jobs_invalid += report.invalid;
}
