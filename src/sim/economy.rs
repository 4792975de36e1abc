//! Derived stats, population growth, production and upkeep.

use super::context::TickContext;
use crate::content::GameConfig;
use crate::model::{Cost, DerivedStats, Entity, EntityId, EntityKind, Timestamp};
use crate::store::RecordStore;

/// Population and troops lost to unpaid upkeep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpkeepReport {
    pub starved: u32,
    pub deserted: u32,
}

/// Reset an entity to base stats, then add every building's per-level bonuses.
pub fn recompute_stats(entity: &mut Entity, content: &GameConfig) {
    let base = &content.base_stats;
    let mut stats = DerivedStats::default();
    let mut max_troops = base.max_troops;
    let mut max_population = base.max_population;

    for (name, &level) in &entity.buildings {
        let Some(def) = content.building(name) else {
            continue;
        };
        let bonus = &def.bonuses;
        let lvl = f64::from(level);
        stats.attack_mult += bonus.attack * lvl;
        stats.defense_mult += bonus.defense * lvl;
        stats.population_growth += bonus.population_growth * lvl;
        max_troops += bonus.troop_cap * level;
        max_population += bonus.population_cap * level;
        for (resource, amount) in &bonus.production {
            *stats.production.entry(resource.clone()).or_default() += amount * lvl;
        }
    }

    entity.stats = stats;
    entity.max_troops = max_troops;
    entity.max_population = max_population;
}

/// Create a city with the configured starting troops, population, resources
/// and buildings, with stats already derived.
pub fn found_city(
    store: &mut dyn RecordStore,
    content: &GameConfig,
    kind: EntityKind,
    name: &str,
    now: Timestamp,
) -> EntityId {
    let start = &content.starting;
    let id = store.create_entity(kind, name);
    if let Some(entity) = store.entity_mut(id) {
        entity.troops = start.troops;
        entity.population = start.population;
        entity.spies = start.spies;
        for (resource, amount) in &start.resources {
            entity.resources.set(resource, *amount);
        }
        entity.buildings = start.buildings.clone();
        entity.last_active = now;
        recompute_stats(entity, content);
    }
    tracing::info!(category = "WORLD", entity = id, name, kind = %kind, "city founded");
    id
}

pub fn recompute_all(store: &mut dyn RecordStore, content: &GameConfig) {
    for id in store.entity_ids() {
        if let Some(entity) = store.entity_mut(id) {
            recompute_stats(entity, content);
        }
    }
}

/// Grow population toward its cap and add the tick's production.
pub fn grow_and_produce(entity: &mut Entity, content: &GameConfig) {
    let base = &content.base_stats;

    let growth = (base.population_growth + entity.stats.population_growth).round() as u32;
    if entity.population < entity.max_population {
        entity.population = (entity.population + growth).min(entity.max_population);
    }

    let people = f64::from(entity.population);
    for (resource, amount) in &base.production {
        entity.resources.add(resource, *amount);
    }
    for (resource, per_capita) in &base.per_capita_production {
        entity.resources.add(resource, per_capita * people);
    }
    for (resource, amount) in &entity.stats.production {
        entity.resources.add(resource, *amount);
    }
}

/// Charge food for the population and gold for soldiers and buildings.
///
/// Each payment is all-or-nothing; a missed food payment starves part of the
/// population and a missed gold payment makes part of the army desert.
pub fn pay_upkeep(entity: &mut Entity, content: &GameConfig) -> UpkeepReport {
    let cfg = &content.upkeep;
    let mut report = UpkeepReport::default();

    let food: Cost = [(
        cfg.food_resource.clone(),
        f64::from(entity.population) * cfg.food_per_person,
    )]
    .into_iter()
    .collect();
    if entity.resources.consume(&food).is_err() && entity.population > 0 {
        let lost = ((f64::from(entity.population) * cfg.starvation_rate) as u32).max(1);
        entity.population -= lost.min(entity.population);
        report.starved = lost;
    }

    let mut gold = Cost::new();
    gold.insert(
        cfg.gold_resource.clone(),
        f64::from(entity.troops) * cfg.gold_per_soldier,
    );
    for (name, &level) in &entity.buildings {
        if let Some(def) = content.building(name) {
            for (resource, amount) in &def.upkeep {
                *gold.entry(resource.clone()).or_default() += amount * f64::from(level);
            }
        }
    }
    if entity.resources.consume(&gold).is_err() && entity.troops > 0 {
        let lost = ((f64::from(entity.troops) * cfg.desertion_rate) as u32).max(1);
        entity.troops -= lost.min(entity.troops);
        report.deserted = lost;
    }

    report
}

/// Growth, production and upkeep for every entity.
pub fn run_economy(ctx: &mut TickContext<'_>) {
    let content = ctx.content;
    for id in ctx.store.entity_ids() {
        let Some(entity) = ctx.store.entity_mut(id) else {
            continue;
        };
        grow_and_produce(entity, content);
        let report = pay_upkeep(entity, content);
        let name = entity.name.clone();

        if report.starved > 0 {
            ctx.notify(id, &format!("Famine! {} people starved.", report.starved));
            tracing::info!(category = "ECONOMY", entity = %name, starved = report.starved, "food upkeep missed");
        }
        if report.deserted > 0 {
            ctx.notify(id, &format!("Unpaid troops! {} soldiers deserted.", report.deserted));
            tracing::info!(category = "ECONOMY", entity = %name, deserted = report.deserted, "gold upkeep missed");
        }
    }
}
