//! Battle resolution: flat power comparison with jitter, casualties smoothed
//! across a parity band, and loot for a prevailing attacker.

use rand::{Rng, RngCore};

use super::context::TickContext;
use super::npc::traits::{TraitEvent, nudge};
use crate::content::CombatConfig;
use crate::model::{AttackId, BattleOutcome, JobStatus, Victor};

/// The two forces meeting in a battle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleSides {
    pub committed: u32,
    pub attack_mult: f64,
    pub garrison: u32,
    pub defense_mult: f64,
}

/// Result of [`resolve_attack`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttackResolution {
    Resolved(BattleOutcome),
    /// A participant no longer exists; the record was marked invalid.
    Invalid,
    /// The record is missing or already left `Pending`.
    Skipped,
}

fn jitter(r: f64, rng: &mut dyn RngCore) -> f64 {
    if r <= 0.0 {
        1.0
    } else {
        rng.random_range((1.0 - r)..=(1.0 + r))
    }
}

/// Round raw casualties and keep them within `[1, force]` for a non-empty force.
fn settle_losses(raw: f64, force: u32) -> u32 {
    if force == 0 {
        return 0;
    }
    (raw.round().max(0.0) as u32).clamp(1, force)
}

/// Compute powers, outcome and casualties. Loot is left empty.
pub fn resolve(sides: &BattleSides, cfg: &CombatConfig, rng: &mut dyn RngCore) -> BattleOutcome {
    let attack_power = f64::from(sides.committed) * sides.attack_mult * jitter(cfg.jitter, rng);
    let defense_power =
        f64::from(sides.garrison.max(1)) * sides.defense_mult * jitter(cfg.jitter, rng);

    let ratio = attack_power / defense_power;
    let stronger = attack_power.max(defense_power);
    let diff_ratio = if stronger > 0.0 {
        (attack_power - defense_power).abs() / stronger
    } else {
        0.0
    };
    let loss_mult = cfg.casualty_base + cfg.casualty_variation * diff_ratio;

    let committed = f64::from(sides.committed);
    let garrison = f64::from(sides.garrison);

    // (attacker losses, defender losses) for each decisive branch
    let attacker_wins = (
        committed * loss_mult * cfg.winner_loss_factor * (defense_power / attack_power.max(f64::MIN_POSITIVE)),
        garrison * loss_mult,
    );
    let defender_wins = (
        committed * loss_mult,
        garrison * loss_mult * cfg.winner_loss_factor * (attack_power / defense_power),
    );

    let (victor, (raw_attacker, raw_defender)) =
        if (cfg.parity_low..=cfg.parity_high).contains(&ratio) {
            let t = (ratio - cfg.parity_low) / (cfg.parity_high - cfg.parity_low);
            (
                Victor::Blended,
                (
                    defender_wins.0 * (1.0 - t) + attacker_wins.0 * t,
                    defender_wins.1 * (1.0 - t) + attacker_wins.1 * t,
                ),
            )
        } else if attack_power >= defense_power {
            (Victor::Attacker, attacker_wins)
        } else {
            (Victor::Defender, defender_wins)
        };

    BattleOutcome {
        victor,
        attack_power,
        defense_power,
        attacker_losses: settle_losses(raw_attacker, sides.committed),
        defender_losses: settle_losses(raw_defender, sides.garrison),
        defender_troops: sides.garrison,
        loot_resource: None,
        loot_amount: 0.0,
    }
}

/// Resolve a pending attack whose travel time has elapsed.
///
/// Survivors return to the attacker's garrison. The outcome is persisted on the
/// record before any troop or resource moves, so a record resolves at most once.
pub fn resolve_attack(ctx: &mut TickContext<'_>, id: AttackId) -> AttackResolution {
    let Some(record) = ctx.store.attack(id).cloned() else {
        return AttackResolution::Skipped;
    };
    if record.status != JobStatus::Pending {
        return AttackResolution::Skipped;
    }

    let participants = ctx
        .store
        .entity(record.attacker)
        .zip(ctx.store.entity(record.defender))
        .map(|(attacker, defender)| {
            let sides = BattleSides {
                committed: record.troops,
                attack_mult: attacker.stats.attack_mult,
                garrison: defender.troops,
                defense_mult: defender.stats.defense_mult,
            };
            let plunder = defender
                .resources
                .preferred_or_largest(&ctx.content.combat.loot_resource);
            (sides, attacker.name.clone(), defender.name.clone(), plunder)
        });
    let Some((sides, attacker_name, defender_name, plunder)) = participants else {
        ctx.store.transition_attack(id, JobStatus::Invalid);
        tracing::warn!(category = "WAR", attack = id, "attack references a missing entity");
        return AttackResolution::Invalid;
    };

    let mut outcome = resolve(&sides, &ctx.content.combat, ctx.rng);
    if outcome.attacker_prevailed() {
        if let Some((resource, held)) = plunder {
            let cfg = &ctx.content.combat;
            let fraction = ctx
                .rng
                .random_range(cfg.loot_min_fraction..=cfg.loot_max_fraction);
            outcome.loot_amount = (held * fraction).min(held);
            outcome.loot_resource = Some(resource);
        }
    }

    if !ctx.store.complete_attack(id, outcome.clone()) {
        return AttackResolution::Skipped;
    }

    let prevailed = outcome.attacker_prevailed();
    let mut looted = 0.0;
    if let Some(defender) = ctx.store.entity_mut(record.defender) {
        defender.troops = defender.troops.saturating_sub(outcome.defender_losses);
        if let Some(resource) = &outcome.loot_resource {
            looted = defender.resources.take(resource, outcome.loot_amount);
        }
        if !prevailed {
            defender.battles_won += 1;
        }
        nudge(
            defender,
            if prevailed { TraitEvent::LostBattle } else { TraitEvent::WonBattle },
            ctx.content,
        );
    }
    if let Some(attacker) = ctx.store.entity_mut(record.attacker) {
        attacker.troops += record.troops - outcome.attacker_losses;
        if let Some(resource) = &outcome.loot_resource {
            attacker.resources.add(resource, looted);
        }
        if prevailed {
            attacker.battles_won += 1;
        }
        nudge(
            attacker,
            if prevailed { TraitEvent::WonBattle } else { TraitEvent::LostBattle },
            ctx.content,
        );
    }

    let loot_text = match &outcome.loot_resource {
        Some(resource) => format!("{looted:.0} {resource}"),
        None => "nothing".to_string(),
    };
    ctx.notify(
        record.attacker,
        &format!(
            "Battle report vs {defender_name} ({}): sent {}, lost {}; enemy had {}, lost {}; loot {loot_text}.",
            outcome.victor, record.troops, outcome.attacker_losses, outcome.defender_troops, outcome.defender_losses,
        ),
    );
    ctx.notify(
        record.defender,
        &format!(
            "{attacker_name} attacked with {} troops ({}): you lost {} of {}, they lost {}; plundered {loot_text}.",
            record.troops, outcome.victor, outcome.defender_losses, outcome.defender_troops, outcome.attacker_losses,
        ),
    );
    tracing::info!(
        category = "WAR",
        attacker = %attacker_name,
        defender = %defender_name,
        victor = %outcome.victor,
        attacker_losses = outcome.attacker_losses,
        defender_losses = outcome.defender_losses,
        "battle resolved"
    );

    AttackResolution::Resolved(outcome)
}
