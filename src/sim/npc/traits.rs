//! Trait evolution: event nudges, decay toward the archetype baseline,
//! performance feedback and the greed/risk economic traits.

use rand::Rng;

use crate::content::{EconomicTraitConfig, GameConfig, PersonalityProfile};
use crate::model::{Entity, EntityId, NpcState, Personality, SleepCycle, TraitVector};
use crate::sim::context::TickContext;
use crate::sim::diplomacy::enemies_of;

/// Events that push an NPC's live traits away from baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitEvent {
    WonBattle,
    LostBattle,
    LowResources,
    Attacked,
}

/// Archetype baseline trait vector.
pub fn baseline(profile: &PersonalityProfile) -> TraitVector {
    TraitVector::new(profile.attack_chance, profile.build_chance, profile.peace_chance)
}

/// Fresh NPC state seeded from the archetype baseline.
pub fn seed_state(personality: Personality, content: &GameConfig) -> NpcState {
    let mut traits = baseline(content.profile(personality));
    traits.clamp(content.npc.trait_min, content.npc.trait_max);
    NpcState {
        personality,
        traits,
        greed: 1.0,
        risk: 1.0,
        cycle: SleepCycle::default(),
    }
}

pub fn evolve(traits: &mut TraitVector, event: TraitEvent, delta: f64, lo: f64, hi: f64) {
    match event {
        TraitEvent::WonBattle => {
            traits.attack_chance += delta;
            traits.peace_chance -= delta;
        }
        TraitEvent::LostBattle => {
            traits.attack_chance -= delta;
            traits.peace_chance += delta;
        }
        TraitEvent::LowResources => {
            traits.build_chance += delta;
            traits.attack_chance -= delta;
        }
        TraitEvent::Attacked => {
            traits.attack_chance += delta / 2.0;
            traits.peace_chance -= delta / 2.0;
        }
    }
    traits.clamp(lo, hi);
}

/// Apply a trait event if `entity` is an NPC. Players are unaffected.
pub fn nudge(entity: &mut Entity, event: TraitEvent, content: &GameConfig) {
    let npc_cfg = &content.npc;
    if let Some(npc) = entity.npc.as_mut() {
        evolve(&mut npc.traits, event, npc_cfg.trait_delta, npc_cfg.trait_min, npc_cfg.trait_max);
        tracing::debug!(category = "TRAITS", entity = %entity.name, ?event, "traits nudged");
    }
}

/// Move each trait `rate` of the way back toward its baseline.
pub fn decay_toward(traits: &mut TraitVector, base: &TraitVector, rate: f64, lo: f64, hi: f64) {
    traits.attack_chance += (base.attack_chance - traits.attack_chance) * rate;
    traits.build_chance += (base.build_chance - traits.build_chance) * rate;
    traits.peace_chance += (base.peace_chance - traits.peace_chance) * rate;
    traits.clamp(lo, hi);
}

/// Decay every NPC's traits toward baseline, and greed/risk toward neutral.
pub fn decay_all(ctx: &mut TickContext<'_>) {
    let content = ctx.content;
    let npc_cfg = &content.npc;
    for id in ctx.store.npc_ids() {
        let Some(npc) = ctx.store.entity_mut(id).and_then(|e| e.npc.as_mut()) else {
            continue;
        };
        let base = baseline(content.profile(npc.personality));
        decay_toward(&mut npc.traits, &base, npc_cfg.decay_rate, npc_cfg.trait_min, npc_cfg.trait_max);
        decay_economic(npc, &npc_cfg.economic_traits);
    }
}

/// Greed and risk rise after profitable trades and fall after losses.
pub fn apply_trade_result(npc: &mut NpcState, profit: f64, cfg: &EconomicTraitConfig) {
    let delta = if profit > 0.0 {
        cfg.profit_step
    } else if profit < 0.0 {
        -cfg.loss_step
    } else {
        0.0
    };
    npc.greed = (npc.greed + delta).clamp(cfg.min, cfg.max);
    npc.risk = (npc.risk + delta).clamp(cfg.min, cfg.max);
}

/// Prestige change for a single trade result.
pub fn trade_prestige(profit: f64, cfg: &EconomicTraitConfig) -> f64 {
    let mult = if profit > 0.0 {
        cfg.prestige_gain_mult
    } else {
        cfg.prestige_loss_mult
    };
    profit / 100.0 * mult
}

pub fn decay_economic(npc: &mut NpcState, cfg: &EconomicTraitConfig) {
    npc.greed = (npc.greed + (1.0 - npc.greed) * cfg.decay_rate).clamp(cfg.min, cfg.max);
    npc.risk = (npc.risk + (1.0 - npc.risk) * cfg.decay_rate).clamp(cfg.min, cfg.max);
}

/// Performance feedback: recent trade profit moves build, peace moves
/// peace, and wealth moves attack.
pub fn personality_feedback(ctx: &mut TickContext<'_>, id: EntityId) {
    let content = ctx.content;
    let cfg = &content.npc.feedback;
    if !ctx.rng.random_bool(cfg.chance) {
        return;
    }
    let window_start = ctx.before_ticks(cfg.profit_window_ticks);
    let profit: f64 = ctx
        .store
        .trades_for(id, window_start)
        .iter()
        .map(|t| t.profit)
        .sum();
    let at_peace = enemies_of(ctx.store, id).is_empty();
    let Some(entity) = ctx.store.entity_mut(id) else {
        return;
    };
    let wealth = entity.resources.get(&content.market.currency);
    let Some(npc) = entity.npc.as_mut() else {
        return;
    };

    let rate = cfg.evolution_rate;
    let delta_build = if profit > 0.0 {
        rate * cfg.trade_profit_weight
    } else if profit < 0.0 {
        rate * cfg.trade_loss_weight
    } else {
        0.0
    };
    let delta_peace = if at_peace && profit >= 0.0 {
        rate * cfg.peace_weight
    } else {
        0.0
    };
    let delta_attack = if wealth < cfg.poor_threshold {
        rate * cfg.low_wealth_weight
    } else if wealth > cfg.rich_threshold {
        rate * cfg.high_wealth_weight
    } else {
        0.0
    };

    npc.traits.build_chance += delta_build;
    npc.traits.peace_chance += delta_peace;
    npc.traits.attack_chance += delta_attack;
    npc.traits.clamp(content.npc.trait_min, content.npc.trait_max);
    tracing::debug!(category = "TRAITS", entity = %entity.name, traits = ?npc.traits, "feedback applied");
}

#[cfg(test)]
mod tests {
    use super::*;

    const LO: f64 = 0.05;
    const HI: f64 = 0.95;

    #[test]
    fn every_event_keeps_traits_in_bounds() {
        let events = [
            TraitEvent::WonBattle,
            TraitEvent::LostBattle,
            TraitEvent::LowResources,
            TraitEvent::Attacked,
        ];
        let mut traits = TraitVector::new(0.5, 0.5, 0.5);
        for i in 0..500 {
            evolve(&mut traits, events[i % 4], 0.3, LO, HI);
            evolve(&mut traits, events[(i * 7) % 4], 0.3, LO, HI);
            for v in [traits.attack_chance, traits.build_chance, traits.peace_chance] {
                assert!((LO..=HI).contains(&v), "{v}");
            }
        }
    }

    #[test]
    fn winning_raises_attack_and_lowers_peace() {
        let mut traits = TraitVector::new(0.5, 0.5, 0.5);
        evolve(&mut traits, TraitEvent::WonBattle, 0.05, LO, HI);
        assert!((traits.attack_chance - 0.55).abs() < 1e-9);
        assert!((traits.peace_chance - 0.45).abs() < 1e-9);
        assert_eq!(traits.build_chance, 0.5);
    }

    #[test]
    fn decay_converges_to_baseline() {
        let base = TraitVector::new(0.1, 0.6, 0.2);
        let mut traits = TraitVector::new(0.95, 0.05, 0.95);
        for _ in 0..1_000 {
            decay_toward(&mut traits, &base, 0.01, LO, HI);
        }
        assert!(traits.distance(&base) < 0.001);
    }

    #[test]
    fn economic_traits_are_bounded() {
        let cfg = GameConfig::standard().npc.economic_traits;
        let mut npc = seed_state(Personality::Economist, &GameConfig::standard());
        for _ in 0..200 {
            apply_trade_result(&mut npc, 10.0, &cfg);
        }
        assert_eq!(npc.greed, cfg.max);
        for _ in 0..200 {
            apply_trade_result(&mut npc, -10.0, &cfg);
        }
        assert_eq!(npc.risk, cfg.min);
        decay_economic(&mut npc, &cfg);
        assert!(npc.risk > cfg.min);
    }

    #[test]
    fn players_ignore_nudges() {
        let content = GameConfig::standard();
        let mut player = Entity::new(1, crate::model::EntityKind::Player, "p");
        nudge(&mut player, TraitEvent::Attacked, &content);
        assert!(player.npc.is_none());
    }
}
