use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::{advance_clock, stamp_clock};

/// Schedule label for one world tick.
/// Run manually each tick via `app.world_mut().run_schedule(WorldTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorldTick;

/// Ordered phases within each world tick.
///
/// ```text
/// Begin → Jobs → Stats → Economy → Espionage → Prestige → Combat → Events → Npc → Last
/// ```
///
/// Stats precede Combat so battles see current building bonuses; Economy
/// precedes Espionage so upkeep shortfalls are visible to missions.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickPhase {
    Begin,
    Jobs,
    Stats,
    Economy,
    Espionage,
    Prestige,
    Combat,
    Events,
    Npc,
    Last,
}

/// Build a `WorldTick` schedule with phase ordering and the clock systems.
pub fn configure_world_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(WorldTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            TickPhase::Begin,
            TickPhase::Jobs,
            TickPhase::Stats,
            TickPhase::Economy,
            TickPhase::Espionage,
            TickPhase::Prestige,
            TickPhase::Combat,
            TickPhase::Events,
            TickPhase::Npc,
            TickPhase::Last,
        )
            .chain(),
    );
    schedule.add_systems(stamp_clock.in_set(TickPhase::Begin));
    schedule.add_systems(advance_clock.in_set(TickPhase::Last));
    schedule
}
