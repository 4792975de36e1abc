use bevy_app::App;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ResMut;

use super::TickEnv;
use crate::ecs::resources::{EventsRng, TickSummary};
use crate::ecs::schedule::{TickPhase, WorldTick};
use crate::sim::roll_random_events;

pub fn add_event_systems(app: &mut App) {
    app.add_systems(WorldTick, roll_events.in_set(TickPhase::Events));
}

/// Age running world events, maybe start one, then roll per-city windfalls
/// and mishaps.
fn roll_events(env: TickEnv, mut rng: ResMut<EventsRng>, mut summary: ResMut<TickSummary>) {
    let started = {
        let mut state = env.events.0.write();
        state.advance(&env.content.0.world_events, &mut rng.0)
    };
    if let Some(name) = &started {
        tracing::info!(category = "EVENT", event = %name, "world event started");
    }
    summary.world_event_started = started;
    env.run(&mut rng.0, roll_random_events);
}
