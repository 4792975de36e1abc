//! End-of-tick bookkeeping: periodic JSONL checkpoints and the tick summary log.

use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::{Res, ResMut};

use crate::ecs::clock::{WorldClock, advance_clock};
use crate::ecs::conditions::checkpoint_due;
use crate::ecs::resources::{Content, SharedStore, TickSummary, WorldConfig};
use crate::ecs::schedule::{TickPhase, WorldTick};
use crate::flush::flush_to_jsonl;
use crate::sim::prune_trade_history;

pub fn add_checkpoint_systems(app: &mut App) {
    app.add_systems(
        WorldTick,
        (
            prune_trades,
            write_checkpoint.run_if(checkpoint_due),
            log_tick_summary,
        )
            .chain()
            .before(advance_clock)
            .in_set(TickPhase::Last),
    );
}

/// Registered in `TickPhase::Begin` by the app builder, ahead of every
/// system that writes the summary.
pub fn reset_summary(clock: Res<WorldClock>, mut summary: ResMut<TickSummary>) {
    *summary = TickSummary {
        tick: clock.tick_count,
        ..TickSummary::default()
    };
}

fn prune_trades(store: Res<SharedStore>, content: Res<Content>, clock: Res<WorldClock>) {
    let dropped = prune_trade_history(&mut *store.0.lock(), &content.0, clock.now);
    if dropped > 0 {
        tracing::debug!(category = "MARKET", dropped, "old trades pruned");
    }
}

fn write_checkpoint(store: Res<SharedStore>, config: Res<WorldConfig>, clock: Res<WorldClock>) {
    let Some(dir) = &config.output_dir else {
        return;
    };
    let snapshot = store.0.lock().snapshot();
    match flush_to_jsonl(&snapshot, dir) {
        Ok(()) => tracing::info!(
            category = "WORLD",
            tick = clock.tick_count,
            entities = snapshot.entities.len(),
            dir = %dir.display(),
            "checkpoint written"
        ),
        Err(e) => tracing::warn!(category = "WORLD", error = %e, "checkpoint failed"),
    }
}

fn log_tick_summary(summary: Res<TickSummary>) {
    tracing::debug!(
        category = "WORLD",
        tick = summary.tick,
        jobs = summary.jobs_completed,
        invalid = summary.jobs_invalid,
        battles = summary.battles,
        npc_actions = summary.npc_actions,
        npcs_asleep = summary.npcs_asleep,
        "tick complete"
    );
}
