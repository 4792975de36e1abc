use std::collections::BTreeMap;

use super::context::TickContext;
use super::market::price_table;
use super::npc::traits::trade_prestige;
use crate::content::PrestigeWeights;
use crate::model::Entity;

/// Weighted score of military success, wealth, population and development.
pub fn compute_prestige(
    entity: &Entity,
    weights: &PrestigeWeights,
    prices: &BTreeMap<String, f64>,
    at_peace: bool,
) -> f64 {
    let wealth: f64 = entity
        .resources
        .iter()
        .map(|(resource, amount)| amount * prices.get(resource).copied().unwrap_or(0.0))
        .sum();
    let peace = if at_peace { weights.peace_bonus } else { 0.0 };
    f64::from(entity.battles_won) * weights.battles_won
        + wealth * weights.resource_value
        + f64::from(entity.population) * weights.population
        + f64::from(entity.total_building_levels()) * weights.building_level
        + peace
}

/// Recompute prestige for every entity at current market prices, plus the
/// reputation earned or lost on the market over the recent trade window.
pub fn update_prestige(ctx: &mut TickContext<'_>) {
    let content = ctx.content;
    let prices = price_table(ctx.store, content, ctx.modifiers);
    let weights = &content.prestige;
    let window_start = ctx.before_ticks(content.npc.feedback.profit_window_ticks);
    for id in ctx.store.entity_ids() {
        let at_peace = ctx.store.active_wars_for(id).is_empty();
        let trading: f64 = ctx
            .store
            .trades_for(id, window_start)
            .iter()
            .map(|t| trade_prestige(t.profit, &content.npc.economic_traits))
            .sum();
        if let Some(entity) = ctx.store.entity_mut(id) {
            entity.prestige = compute_prestige(entity, weights, &prices, at_peace) + trading;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityKind, ResourceLedger};

    #[test]
    fn prestige_sums_weighted_parts() {
        let weights = PrestigeWeights {
            battles_won: 10.0,
            resource_value: 0.01,
            population: 0.05,
            building_level: 2.0,
            peace_bonus: 10.0,
        };
        let mut e = Entity::new(1, EntityKind::Player, "a");
        e.battles_won = 3;
        e.population = 100;
        e.buildings.insert("Farm".into(), 2);
        e.resources = ResourceLedger::from([("gold", 1000.0)]);
        let prices = BTreeMap::from([("gold".to_string(), 1.0)]);

        let at_peace = compute_prestige(&e, &weights, &prices, true);
        assert!((at_peace - (30.0 + 10.0 + 5.0 + 4.0 + 10.0)).abs() < 1e-9);
        let at_war = compute_prestige(&e, &weights, &prices, false);
        assert!((at_peace - at_war - 10.0).abs() < 1e-9);
    }
}
