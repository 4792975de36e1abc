//! Spy mission outcomes.

use rand::{Rng, RngCore};
use rand::seq::IndexedRandom;

use super::context::TickContext;
use crate::content::EspionageConfig;
use crate::model::{EntityId, IntelReport, SpyAction};

#[derive(Debug, Clone, PartialEq)]
pub enum MissionOutcome {
    Scouted,
    Stole { resource: String, amount: f64 },
    Sabotaged { building: Option<String> },
    /// The spy was captured.
    Failed,
}

/// Success chance after the owner's Academy bonus and the target's Watchtower penalty.
pub fn success_chance(
    cfg: &EspionageConfig,
    action: SpyAction,
    academy_levels: u32,
    watchtower_levels: u32,
) -> f64 {
    let chance = cfg.action(action).success_chance
        + f64::from(academy_levels) * cfg.academy_bonus
        - f64::from(watchtower_levels) * cfg.watchtower_penalty;
    chance.clamp(cfg.min_chance, cfg.max_chance)
}

fn roll(chance: f64, rng: &mut dyn RngCore) -> bool {
    rng.random::<f64>() < chance
}

/// Apply a finished mission. The spy returns home on success.
pub fn resolve_mission(
    ctx: &mut TickContext<'_>,
    owner: EntityId,
    action: SpyAction,
    target: EntityId,
) -> MissionOutcome {
    let content = ctx.content;
    let cfg = &content.espionage;
    let (Some(spy_master), Some(victim)) = (ctx.store.entity(owner), ctx.store.entity(target))
    else {
        return MissionOutcome::Failed;
    };
    let chance = success_chance(
        cfg,
        action,
        spy_master.building_level(&cfg.academy_building),
        victim.building_level(&cfg.watchtower_building),
    );
    let owner_name = spy_master.name.clone();
    let target_name = victim.name.clone();

    if !roll(chance, ctx.rng) {
        ctx.notify(owner, &format!("Your spy was captured in {target_name}."));
        ctx.notify(target, &format!("You captured a spy sent by {owner_name}."));
        tracing::info!(category = "ESPIONAGE", owner = %owner_name, target = %target_name, action = %action, "mission failed");
        return MissionOutcome::Failed;
    }

    let outcome = match action {
        SpyAction::Scout => {
            let report = IntelReport {
                owner,
                target,
                troops: victim.troops,
                population: victim.population,
                resources: victim.resources.clone(),
                buildings: victim.buildings.clone(),
                gathered_at: ctx.now,
            };
            ctx.store.record_intel(report);
            ctx.notify(
                owner,
                &format!("Your spy returned from {target_name} with a full report."),
            );
            MissionOutcome::Scouted
        }
        SpyAction::Steal => {
            let stolen = victim
                .resources
                .preferred_or_largest(&content.market.currency)
                .map(|(resource, held)| (resource, held * cfg.steal_fraction));
            match stolen {
                Some((resource, amount)) => {
                    let mut taken = 0.0;
                    if let Some(victim) = ctx.store.entity_mut(target) {
                        taken = victim.resources.take(&resource, amount);
                    }
                    if let Some(thief) = ctx.store.entity_mut(owner) {
                        thief.resources.add(&resource, taken);
                    }
                    ctx.notify(owner, &format!("Your spy stole {taken:.0} {resource} from {target_name}."));
                    ctx.notify(target, &format!("Thieves made off with {taken:.0} {resource}!"));
                    MissionOutcome::Stole {
                        resource,
                        amount: taken,
                    }
                }
                None => MissionOutcome::Stole {
                    resource: content.market.currency.clone(),
                    amount: 0.0,
                },
            }
        }
        SpyAction::Sabotage => {
            let standing: Vec<String> = victim
                .buildings
                .iter()
                .filter(|&(_, &lvl)| lvl > 0)
                .map(|(name, _)| name.clone())
                .collect();
            let building = standing.choose(ctx.rng).cloned();
            if let Some(name) = &building {
                if let Some(victim) = ctx.store.entity_mut(target) {
                    if let Some(level) = victim.buildings.get_mut(name) {
                        *level = level.saturating_sub(cfg.sabotage_damage);
                    }
                }
                ctx.notify(owner, &format!("Your spy sabotaged the {name} of {target_name}."));
                ctx.notify(target, &format!("Saboteurs damaged your {name}!"));
            }
            MissionOutcome::Sabotaged { building }
        }
    };

    if let Some(spy_master) = ctx.store.entity_mut(owner) {
        spy_master.spies += 1;
    }
    tracing::info!(category = "ESPIONAGE", owner = %owner_name, target = %target_name, action = %action, "mission succeeded");
    outcome
}
