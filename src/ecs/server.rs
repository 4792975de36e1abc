//! Real-time driver: one world tick per fixed interval until shutdown.

use std::future::Future;
use std::time::Duration;

use bevy_app::App;
use tokio::time::MissedTickBehavior;

use super::app::run_tick;
use super::clock::WorldClock;

/// Tick `app` every `period` until `shutdown` resolves. Returns the number of
/// ticks run by this call.
///
/// A late tick is delayed rather than bursted, so a slow tick never causes a
/// catch-up storm.
pub async fn run_world_loop(app: &mut App, period: Duration, shutdown: impl Future<Output = ()>) -> u64 {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut ran = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                run_tick(app);
                ran += 1;
            }
        }
    }

    let tick = app.world().resource::<WorldClock>().tick_count;
    tracing::info!(category = "WORLD", tick, ran, "world loop stopped");
    ran
}
