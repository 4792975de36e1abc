use rand::{Rng, RngCore};

use crate::content::PersonalityProfile;
use crate::model::{NpcState, Timestamp};

// --- Phase length jitter ---
const CYCLE_JITTER_MIN: f64 = 0.8;
const CYCLE_JITTER_MAX: f64 = 1.2;

fn phase_length(base_ticks: u64, rng: &mut dyn RngCore) -> u64 {
    let scaled = base_ticks as f64 * rng.random_range(CYCLE_JITTER_MIN..=CYCLE_JITTER_MAX);
    (scaled.round() as u64).max(1)
}

/// Advance the awake/asleep cycle and report whether the NPC is awake.
///
/// A fresh cycle starts awake. Each transition re-rolls the next phase length.
pub fn advance_cycle(
    npc: &mut NpcState,
    profile: &PersonalityProfile,
    now: Timestamp,
    tick_seconds: u64,
    rng: &mut dyn RngCore,
) -> bool {
    let awake = match npc.cycle.phase_ends_at {
        None => true,
        Some(end) if now >= end => !npc.cycle.awake,
        Some(_) => return npc.cycle.awake,
    };
    let base = if awake {
        profile.awake_ticks
    } else {
        profile.asleep_ticks
    };
    npc.cycle.awake = awake;
    npc.cycle.phase_ends_at = Some(now.plus_ticks(phase_length(base, rng), tick_seconds));
    tracing::trace!(category = "AI_CYCLE", awake, "cycle phase changed");
    awake
}
