//! Spy training and mission choice.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::NpcAction;
use crate::model::{EntityId, IntelReport, JobPayload, SpyAction};
use crate::sim::context::TickContext;
use crate::sim::diplomacy::enemies_of;
use crate::sim::scheduler::schedule;

/// Queue a batch of spies. The scheduler enforces the Academy cap.
pub fn train_spies(ctx: &mut TickContext<'_>, id: EntityId) -> Option<NpcAction> {
    let amount = ctx.content.npc.espionage.train_batch;
    let job = schedule(ctx, id, JobPayload::SpyTraining { amount }).ok()?;
    Some(NpcAction::TrainSpies { amount, job })
}

/// Mission against a known enemy: sabotage the stronger ones, rob the rest.
/// An enemy without a report is scouted first.
pub fn war_mission(
    own_troops: u32,
    enemy: EntityId,
    intel: &[IntelReport],
) -> SpyAction {
    match intel.iter().find(|r| r.target == enemy) {
        Some(report) if report.troops >= own_troops => SpyAction::Sabotage,
        Some(_) => SpyAction::Steal,
        None => SpyAction::Scout,
    }
}

/// Pick an action and target from war status and known intel, then launch.
pub fn launch_mission(ctx: &mut TickContext<'_>, id: EntityId) -> Option<NpcAction> {
    let own_troops = ctx.store.entity(id)?.troops;
    let intel = ctx.store.intel_for(id);
    let enemies = enemies_of(ctx.store, id);

    let (action, target) = if enemies.is_empty() {
        let unknown: Vec<EntityId> = ctx
            .store
            .entity_ids()
            .into_iter()
            .filter(|&t| t != id && !intel.iter().any(|r| r.target == t))
            .collect();
        (SpyAction::Scout, *unknown.choose(ctx.rng)?)
    } else {
        let richest = intel
            .iter()
            .filter(|r| enemies.contains(&r.target))
            .max_by(|a, b| a.total_resources().total_cmp(&b.total_resources()))
            .map(|r| r.target);
        let enemy = match richest {
            Some(t) if ctx.rng.random_bool(ctx.content.npc.espionage.richest_target_chance) => t,
            _ => *enemies.choose(ctx.rng)?,
        };
        (war_mission(own_troops, enemy, &intel), enemy)
    };

    schedule(ctx, id, JobPayload::Espionage { action, target }).ok()?;
    Some(NpcAction::Mission { action, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResourceLedger, Timestamp};

    fn report(target: EntityId, troops: u32) -> IntelReport {
        IntelReport {
            owner: 1,
            target,
            troops,
            population: 0,
            resources: ResourceLedger::from([("gold", 100.0)]),
            buildings: Default::default(),
            gathered_at: Timestamp::from_secs(0),
        }
    }

    #[test]
    fn unknown_enemy_is_scouted() {
        assert_eq!(war_mission(50, 7, &[]), SpyAction::Scout);
    }

    #[test]
    fn strong_enemy_is_sabotaged_weak_one_robbed() {
        let intel = [report(2, 80), report(3, 10)];
        assert_eq!(war_mission(50, 2, &intel), SpyAction::Sabotage);
        assert_eq!(war_mission(50, 3, &intel), SpyAction::Steal);
    }
}
