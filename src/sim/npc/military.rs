//! Troop training, war declaration, attacks and peace.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::NpcAction;
use crate::content::GameConfig;
use crate::model::{Entity, EntityId, IntelReport, JobPayload, PairKey};
use crate::sim::context::TickContext;
use crate::sim::diplomacy::{declare_war, end_war, enemies_of};
use crate::sim::scheduler::{schedule, schedule_attack};
use crate::store::RecordStore;

/// How many troops to queue: a jittered, aggression-scaled share of free
/// capacity, cut down to what population and resources allow.
pub fn choose_training_amount(
    entity: &Entity,
    content: &GameConfig,
    at_war: bool,
    rng: &mut dyn RngCore,
) -> u32 {
    let Some(npc) = entity.npc.as_ref() else {
        return 0;
    };
    let cfg = &content.npc.military;
    let training = &content.training;

    let free = entity.max_troops.saturating_sub(entity.troops);
    let mut aggression = content.profile(npc.personality).aggression;
    if at_war {
        aggression *= cfg.war_aggression_mult;
    }
    let fraction = rng.random_range(cfg.train_fraction_min..=cfg.train_fraction_max) * aggression;
    let mut amount = (f64::from(free) * fraction) as u32;

    if training.population_per_troop > 0 {
        amount = amount.min(entity.population / training.population_per_troop);
    }
    for (resource, per_troop) in &training.troop_cost {
        if *per_troop > 0.0 {
            let affordable = (entity.resources.get(resource) / per_troop) as u32;
            amount = amount.min(affordable);
        }
    }
    amount.min(free)
}

pub fn train_troops(ctx: &mut TickContext<'_>, id: EntityId, at_war: bool) -> Option<NpcAction> {
    let entity = ctx.store.entity(id)?;
    let amount = choose_training_amount(entity, ctx.content, at_war, ctx.rng);
    if amount == 0 {
        return None;
    }
    let job = schedule(ctx, id, JobPayload::Training { amount }).ok()?;
    Some(NpcAction::Train { amount, job })
}

/// Known targets ordered weakest first, richest first among equals.
pub fn rank_intel_targets(mut intel: Vec<IntelReport>) -> Vec<IntelReport> {
    intel.sort_by(|a, b| {
        a.troops
            .cmp(&b.troops)
            .then_with(|| b.total_resources().total_cmp(&a.total_resources()))
    });
    intel
}

fn pick_war_target(ctx: &mut TickContext<'_>, id: EntityId) -> Option<EntityId> {
    let cfg = &ctx.content.npc.military;
    let store: &dyn RecordStore = ctx.store;
    let enemies = enemies_of(store, id);
    let eligible = |target: EntityId| {
        target != id
            && !enemies.contains(&target)
            && store.entity(target).is_some()
            && !store.relation(PairKey::new(id, target)).on_cooldown(ctx.now)
    };

    if ctx.rng.random_bool(cfg.intel_preference) {
        let known = rank_intel_targets(store.intel_for(id));
        if let Some(report) = known.iter().find(|r| eligible(r.target)) {
            return Some(report.target);
        }
    }
    let candidates: Vec<EntityId> = store
        .entity_ids()
        .into_iter()
        .filter(|&t| eligible(t))
        .collect();
    candidates.choose(ctx.rng).copied()
}

/// Either open a new war or send troops against a current enemy.
pub fn attack_or_war(ctx: &mut TickContext<'_>, id: EntityId) -> Option<NpcAction> {
    let content = ctx.content;
    let cfg = &content.npc.military;
    if ctx.rng.random_bool(cfg.war_consider_chance) {
        let target = pick_war_target(ctx, id)?;
        let war = declare_war(ctx, id, target).ok()?;
        return Some(NpcAction::DeclareWar { target, war });
    }

    let enemies = enemies_of(ctx.store, id);
    let target = *enemies.choose(ctx.rng)?;
    let garrison = ctx.store.entity(id)?.troops;
    if garrison == 0 {
        return None;
    }
    let fraction = ctx
        .rng
        .random_range(cfg.attack_fraction_min..=cfg.attack_fraction_max);
    let troops = ((f64::from(garrison) * fraction) as u32).clamp(1, garrison);
    let attack = schedule_attack(ctx, id, target, troops).ok()?;
    Some(NpcAction::Attack {
        target,
        troops,
        attack,
    })
}

/// End one randomly chosen war.
pub fn make_peace(ctx: &mut TickContext<'_>, id: EntityId) -> Option<NpcAction> {
    let enemies = enemies_of(ctx.store, id);
    let target = *enemies.choose(ctx.rng)?;
    let terms = end_war(ctx, id, target).ok()?;
    Some(NpcAction::MakePeace {
        target,
        forced: terms.forced,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::{EntityKind, Personality, ResourceLedger, Timestamp};
    use crate::sim::npc::traits::seed_state;

    fn report(target: EntityId, troops: u32, gold: f64) -> IntelReport {
        IntelReport {
            owner: 1,
            target,
            troops,
            population: 10,
            resources: ResourceLedger::from([("gold", gold)]),
            buildings: Default::default(),
            gathered_at: Timestamp::from_secs(0),
        }
    }

    #[test]
    fn weakest_then_richest_first() {
        let ranked = rank_intel_targets(vec![
            report(2, 30, 10.0),
            report(3, 10, 5.0),
            report(4, 10, 50.0),
        ]);
        let order: Vec<_> = ranked.iter().map(|r| r.target).collect();
        assert_eq!(order, vec![4, 3, 2]);
    }

    #[test]
    fn training_amount_respects_affordability() {
        let content = GameConfig::standard();
        let mut e = Entity::new(1, EntityKind::Npc, "Vel");
        e.npc = Some(seed_state(Personality::Aggressor, &content));
        e.max_troops = 1000;
        e.population = 1000;
        // two troops' worth of gold
        e.resources = ResourceLedger::from([("gold", 10.0), ("food", 1000.0)]);
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..20 {
            assert!(choose_training_amount(&e, &content, true, &mut rng) <= 2);
        }
    }

    #[test]
    fn full_garrison_trains_nothing() {
        let content = GameConfig::standard();
        let mut e = Entity::new(1, EntityKind::Npc, "Vel");
        e.npc = Some(seed_state(Personality::Aggressor, &content));
        e.max_troops = 20;
        e.troops = 20;
        e.population = 100;
        e.resources = ResourceLedger::from([("gold", 1000.0), ("food", 1000.0)]);
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(choose_training_amount(&e, &content, false, &mut rng), 0);
    }
}
