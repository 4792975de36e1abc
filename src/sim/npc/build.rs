//! Build choice: score every constructible building and pick the best
//! affordable one.

use rand::{Rng, RngCore};

use crate::content::GameConfig;
use crate::model::Entity;

/// Score of one building option.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOption {
    pub building: String,
    pub weight: f64,
}

/// Weight every building the entity can still raise a level.
///
/// Scarcity signals, war status and the archetype bias are additive; the sum
/// is divided by the option's total cost and jittered.
pub fn score_buildings(
    entity: &Entity,
    content: &GameConfig,
    at_war: bool,
    rng: &mut dyn RngCore,
) -> Vec<BuildOption> {
    let cfg = &content.npc.build;
    let food = &content.npc.economy.food_resource;
    let bias = entity
        .npc
        .as_ref()
        .map(|npc| &content.profile(npc.personality).build_bias);

    let mut options = Vec::new();
    for (name, def) in &content.buildings {
        if def.max_level.is_some_and(|max| entity.building_level(name) >= max) {
            continue;
        }
        let mut weight = 1.0;
        if *name == cfg.food_building && entity.resources.get(food) < cfg.low_resource_threshold {
            weight += cfg.low_resource_boost;
        }
        if *name == cfg.housing_building && entity.population_fill() > cfg.near_full {
            weight += cfg.housing_boost;
        }
        if *name == cfg.barracks_building && entity.troop_fill() > cfg.near_full {
            weight -= cfg.barracks_penalty;
        }
        if at_war {
            weight += cfg.war_boosts.get(name).copied().unwrap_or(0.0);
        }
        if let Some(bias) = bias {
            weight += bias.get(name).copied().unwrap_or(0.0);
        }

        let cost: f64 = def.cost.values().sum();
        weight /= cost.max(1.0);
        weight *= rng.random_range(cfg.jitter_min..=cfg.jitter_max);
        options.push(BuildOption {
            building: name.clone(),
            weight,
        });
    }
    options
}

/// Highest positive-weight option the entity can afford right now.
pub fn choose_best_building(
    entity: &Entity,
    content: &GameConfig,
    at_war: bool,
    rng: &mut dyn RngCore,
) -> Option<String> {
    score_buildings(entity, content, at_war, rng)
        .into_iter()
        .filter(|opt| opt.weight > 0.0)
        .filter(|opt| {
            content
                .building(&opt.building)
                .is_some_and(|def| entity.resources.can_afford(&def.cost))
        })
        .max_by(|a, b| a.weight.total_cmp(&b.weight))
        .map(|opt| opt.building)
}
