//! Due-job sweeps: construction and training early in the tick, espionage
//! and spy training after the economy has run.

use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ResMut;
use rand::RngCore;

use super::TickEnv;
use crate::ecs::resources::{EspionageRng, JobsRng, TickSummary};
use crate::ecs::schedule::{TickPhase, WorldTick};
use crate::model::JobKind;
use crate::sim::{SweepReport, sweep_due};

pub fn add_job_systems(app: &mut App) {
    app.add_systems(WorldTick, sweep_builds_and_training.in_set(TickPhase::Jobs));
    app.add_systems(WorldTick, sweep_missions.in_set(TickPhase::Espionage));
}

fn sweep_kinds(env: &TickEnv, rng: &mut dyn RngCore, kinds: &[JobKind]) -> SweepReport {
    env.run(rng, |ctx| {
        let mut report = SweepReport::default();
        for &kind in kinds {
            report += sweep_due(ctx, kind);
        }
        report
    })
}

fn record(summary: &mut TickSummary, report: SweepReport) {
    summary.jobs_completed += report.completed;
    summary.jobs_invalid += report.invalid;
}

fn sweep_builds_and_training(
    env: TickEnv,
    mut rng: ResMut<JobsRng>,
    mut summary: ResMut<TickSummary>,
) {
    let report = sweep_kinds(&env, &mut rng.0, &[JobKind::Construction, JobKind::Training]);
    record(&mut summary, report);
}

fn sweep_missions(env: TickEnv, mut rng: ResMut<EspionageRng>, mut summary: ResMut<TickSummary>) {
    let report = sweep_kinds(&env, &mut rng.0, &[JobKind::Espionage, JobKind::SpyTraining]);
    record(&mut summary, report);
}
