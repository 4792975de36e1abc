//! Typed game content: costs, durations, combat constants and NPC profiles.
//!
//! Every table is deserialized from JSON and checked by [`GameConfig::validate`]
//! at load time. Business logic reads fields directly and never falls back to
//! defaults for missing keys.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{Cost, Personality, SpyAction};

const STANDARD_CONTENT: &str = include_str!("../content/standard.json");

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid content: {0}")]
    Invalid(String),
}

fn invalid(msg: impl Into<String>) -> ContentError {
    ContentError::Invalid(msg.into())
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    pub tick: TickConfig,
    pub base_stats: BaseStats,
    pub starting: StartingValues,
    pub training: TrainingConfig,
    pub combat: CombatConfig,
    pub buildings: BTreeMap<String, BuildingDef>,
    pub resources: BTreeMap<String, ResourceDef>,
    pub market: MarketConfig,
    pub espionage: EspionageConfig,
    pub diplomacy: DiplomacyConfig,
    pub upkeep: UpkeepConfig,
    pub random_events: RandomEventConfig,
    pub world_events: Vec<WorldEventDef>,
    pub prestige: PrestigeWeights,
    pub npc: NpcConfig,
}

impl GameConfig {
    /// The embedded standard ruleset.
    pub fn standard() -> Self {
        Self::from_json_str(STANDARD_CONTENT).expect("embedded standard content is valid")
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn building(&self, name: &str) -> Option<&BuildingDef> {
        self.buildings.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceDef> {
        self.resources.get(name)
    }

    pub fn profile(&self, personality: Personality) -> &PersonalityProfile {
        // validate() guarantees every archetype has a profile
        &self.npc.personalities[&personality]
    }

    /// Check cross-table references and numeric ranges.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.tick.tick_seconds == 0 {
            return Err(invalid("tick.tick_seconds must be positive"));
        }
        if self.tick.prestige_interval_ticks == 0 || self.tick.trait_decay_interval_ticks == 0 {
            return Err(invalid("tick intervals must be positive"));
        }

        let check_cost = |owner: &str, cost: &Cost| -> Result<(), ContentError> {
            for (resource, amount) in cost {
                if !self.resources.contains_key(resource) {
                    return Err(invalid(format!("{owner} references unknown resource {resource}")));
                }
                if *amount < 0.0 {
                    return Err(invalid(format!("{owner} has a negative {resource} cost")));
                }
            }
            Ok(())
        };

        check_cost("training.troop_cost", &self.training.troop_cost)?;
        check_cost("espionage.spy_cost", &self.espionage.spy_cost)?;
        for action in SpyAction::ALL {
            check_cost(&format!("espionage.{action}"), &self.espionage.action(*action).cost)?;
            let chance = self.espionage.action(*action).success_chance;
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(format!("espionage.{action}.success_chance out of range")));
            }
        }
        for (name, def) in &self.buildings {
            check_cost(&format!("building {name}"), &def.cost)?;
            check_cost(&format!("building {name} upkeep"), &def.upkeep)?;
        }
        for (name, def) in &self.resources {
            if def.base_price <= 0.0 || def.base_supply <= 0.0 {
                return Err(invalid(format!("resource {name} needs positive base price and supply")));
            }
        }
        for name in [
            &self.market.currency,
            &self.combat.loot_resource,
            &self.upkeep.food_resource,
            &self.upkeep.gold_resource,
            &self.random_events.resource,
            &self.npc.economy.food_resource,
        ] {
            if !self.resources.contains_key(name) {
                return Err(invalid(format!("unknown resource {name}")));
            }
        }
        for name in [
            &self.espionage.academy_building,
            &self.espionage.watchtower_building,
            &self.npc.build.food_building,
            &self.npc.build.housing_building,
            &self.npc.build.barracks_building,
        ] {
            if !self.buildings.contains_key(name) {
                return Err(invalid(format!("unknown building {name}")));
            }
        }
        for name in self.npc.build.war_boosts.keys() {
            if !self.buildings.contains_key(name) {
                return Err(invalid(format!("npc.build.war_boosts references unknown building {name}")));
            }
        }

        let c = &self.combat;
        if c.parity_low >= c.parity_high || c.parity_low <= 0.0 {
            return Err(invalid("combat parity band must satisfy 0 < low < high"));
        }
        if c.loot_min_fraction > c.loot_max_fraction || c.loot_max_fraction > 1.0 {
            return Err(invalid("combat loot fractions must satisfy min <= max <= 1"));
        }
        if !(0.0..1.0).contains(&c.jitter) {
            return Err(invalid("combat.jitter must lie in [0, 1)"));
        }

        let m = &self.market;
        if m.price_floor <= 0.0 || m.price_floor > 1.0 || m.price_ceiling < 1.0 {
            return Err(invalid("market price floor/ceiling must bracket 1.0"));
        }

        let n = &self.npc;
        if n.trait_min >= n.trait_max || n.trait_min < 0.0 || n.trait_max > 1.0 {
            return Err(invalid("npc trait bounds must satisfy 0 <= min < max <= 1"));
        }
        if n.economic_traits.min >= n.economic_traits.max {
            return Err(invalid("npc economic trait bounds must satisfy min < max"));
        }
        for p in Personality::ALL {
            let Some(profile) = n.personalities.get(p) else {
                return Err(invalid(format!("missing personality profile {p}")));
            };
            for name in profile.build_bias.keys() {
                if !self.buildings.contains_key(name) {
                    return Err(invalid(format!("{p} build_bias references unknown building {name}")));
                }
            }
            if profile.trade_interval_min_ticks > profile.trade_interval_max_ticks {
                return Err(invalid(format!("{p} trade interval min exceeds max")));
            }
            if profile.awake_ticks == 0 || profile.asleep_ticks == 0 {
                return Err(invalid(format!("{p} sleep cycle durations must be positive")));
            }
        }
        let ranges = [
            ("npc.market.buy_min_qty/buy_max_qty", n.market.buy_min_qty, n.market.buy_max_qty),
            ("npc.military.train_fraction_min/max", n.military.train_fraction_min, n.military.train_fraction_max),
            ("npc.military.attack_fraction_min/max", n.military.attack_fraction_min, n.military.attack_fraction_max),
            ("npc.build.jitter_min/max", n.build.jitter_min, n.build.jitter_max),
            ("random_events.windfall_min/max", self.random_events.windfall_min, self.random_events.windfall_max),
            ("random_events.mishap_min/max", self.random_events.mishap_min, self.random_events.mishap_max),
            ("combat.loot_min/max_fraction", c.loot_min_fraction, c.loot_max_fraction),
        ];
        for (name, min, max) in ranges {
            // sampled with random_range(min..=max) during the tick
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(invalid(format!("{name} must be finite with min <= max, got {min}..{max}")));
            }
        }

        let mut chances = vec![
            ("random_events.windfall_chance", self.random_events.windfall_chance),
            ("random_events.mishap_chance", self.random_events.mishap_chance),
            ("npc.military.war_consider_chance", n.military.war_consider_chance),
            ("npc.military.intel_preference", n.military.intel_preference),
            ("npc.espionage.train_chance", n.espionage.train_chance),
            ("npc.espionage.launch_chance", n.espionage.launch_chance),
            ("npc.espionage.richest_target_chance", n.espionage.richest_target_chance),
            ("npc.feedback.chance", n.feedback.chance),
        ];
        for event in &self.world_events {
            chances.push((event.name.as_str(), event.chance));
        }
        for (name, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(format!("{name} must be a probability, got {chance}")));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ticks, stats, starting values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickConfig {
    pub tick_seconds: u64,
    pub prestige_interval_ticks: u64,
    pub trait_decay_interval_ticks: u64,
}

/// Stats every entity has before building bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub max_troops: u32,
    pub max_population: u32,
    pub population_growth: f64,
    /// Resource → flat units produced per tick.
    pub production: BTreeMap<String, f64>,
    /// Resource → units produced per inhabitant per tick.
    pub per_capita_production: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingValues {
    pub troops: u32,
    pub population: u32,
    pub spies: u32,
    pub resources: BTreeMap<String, f64>,
    pub buildings: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub ticks: u64,
    /// Cost of a single troop.
    pub troop_cost: Cost,
    pub population_per_troop: u32,
}

// ---------------------------------------------------------------------------
// Combat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Half-width `r` of the uniform power jitter `[1 - r, 1 + r]`.
    pub jitter: f64,
    pub casualty_base: f64,
    pub casualty_variation: f64,
    /// Winner casualties relative to the loser's loss multiplier.
    pub winner_loss_factor: f64,
    pub parity_low: f64,
    pub parity_high: f64,
    pub loot_min_fraction: f64,
    pub loot_max_fraction: f64,
    /// Preferred loot resource; the largest holding is taken otherwise.
    pub loot_resource: String,
    pub travel_ticks: u64,
}

// ---------------------------------------------------------------------------
// Buildings and resources
// ---------------------------------------------------------------------------

/// Per-level bonuses granted by a building. Absent fields grant nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingBonuses {
    pub attack: f64,
    pub defense: f64,
    pub troop_cap: u32,
    pub population_cap: u32,
    pub population_growth: f64,
    pub production: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDef {
    pub cost: Cost,
    pub build_ticks: u64,
    pub max_level: Option<u32>,
    /// Paid per level every tick.
    #[serde(default)]
    pub upkeep: Cost,
    #[serde(default)]
    pub bonuses: BuildingBonuses,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDef {
    pub base_price: f64,
    pub base_supply: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Resource used to pay for and receive proceeds from trades.
    pub currency: String,
    pub price_floor: f64,
    pub price_ceiling: f64,
}

// ---------------------------------------------------------------------------
// Espionage and diplomacy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpyActionDef {
    pub cost: Cost,
    pub ticks: u64,
    pub success_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpyActions {
    pub scout: SpyActionDef,
    pub steal: SpyActionDef,
    pub sabotage: SpyActionDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EspionageConfig {
    pub academy_building: String,
    pub watchtower_building: String,
    pub academy_bonus: f64,
    pub watchtower_penalty: f64,
    pub min_chance: f64,
    pub max_chance: f64,
    pub spies_per_academy_level: u32,
    pub spy_cost: Cost,
    pub spy_training_ticks: u64,
    pub steal_fraction: f64,
    pub sabotage_damage: u32,
    pub actions: SpyActions,
}

impl EspionageConfig {
    pub fn action(&self, action: SpyAction) -> &SpyActionDef {
        match action {
            SpyAction::Scout => &self.actions.scout,
            SpyAction::Steal => &self.actions.steal,
            SpyAction::Sabotage => &self.actions.sabotage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiplomacyConfig {
    pub war_trust_penalty: i32,
    pub forced_peace_penalty: i32,
    pub min_war_ticks: u64,
    pub forced_peace_cooldown_ticks: u64,
}

// ---------------------------------------------------------------------------
// Economy and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpkeepConfig {
    pub food_resource: String,
    pub food_per_person: f64,
    pub gold_resource: String,
    pub gold_per_soldier: f64,
    pub starvation_rate: f64,
    pub desertion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEventConfig {
    pub resource: String,
    pub windfall_chance: f64,
    pub windfall_min: f64,
    pub windfall_max: f64,
    pub mishap_chance: f64,
    pub mishap_min: f64,
    pub mishap_max: f64,
}

/// Multipliers applied while a world event is active. Absent fields are neutral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventEffects {
    pub global_price_mult: f64,
    pub resource_price_mult: BTreeMap<String, f64>,
    pub npc_trade_volume_mult: f64,
    pub npc_trade_rate_mult: f64,
}

impl Default for EventEffects {
    fn default() -> Self {
        Self {
            global_price_mult: 1.0,
            resource_price_mult: BTreeMap::new(),
            npc_trade_volume_mult: 1.0,
            npc_trade_rate_mult: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEventDef {
    pub name: String,
    pub chance: f64,
    pub duration_ticks: u64,
    pub effects: EventEffects,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrestigeWeights {
    pub battles_won: f64,
    pub resource_value: f64,
    pub population: f64,
    pub building_level: f64,
    pub peace_bonus: f64,
}

// ---------------------------------------------------------------------------
// NPC behavior
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub attack_chance: f64,
    pub build_chance: f64,
    pub peace_chance: f64,
    /// Building → additive weight bias when choosing what to build.
    pub build_bias: BTreeMap<String, f64>,
    /// Share of free troop capacity this archetype is willing to train.
    pub aggression: f64,
    /// Market threshold bias; above 1.0 sells earlier and buys later.
    pub trade_bias: f64,
    pub trade_interval_min_ticks: u64,
    pub trade_interval_max_ticks: u64,
    pub awake_ticks: u64,
    pub asleep_ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcBuildConfig {
    pub low_resource_threshold: f64,
    pub near_full: f64,
    pub food_building: String,
    pub housing_building: String,
    pub barracks_building: String,
    pub low_resource_boost: f64,
    pub housing_boost: f64,
    pub barracks_penalty: f64,
    pub war_boosts: BTreeMap<String, f64>,
    pub jitter_min: f64,
    pub jitter_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcMilitaryConfig {
    pub war_consider_chance: f64,
    pub intel_preference: f64,
    pub attack_fraction_min: f64,
    pub attack_fraction_max: f64,
    pub train_fraction_min: f64,
    pub train_fraction_max: f64,
    pub war_aggression_mult: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcEspionageConfig {
    pub train_chance: f64,
    pub train_batch: u32,
    pub launch_chance: f64,
    /// Chance a war-time mission goes after the richest known enemy rather than a random one.
    pub richest_target_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcMarketConfig {
    pub buy_below: f64,
    pub sell_above: f64,
    pub buy_min_qty: f64,
    pub buy_max_qty: f64,
    /// Currency held must exceed `base_price × this` before buying.
    pub buy_reserve_mult: f64,
    /// Holding must exceed this before any of it is sold.
    pub sell_reserve: f64,
    pub sell_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcEconomyConfig {
    pub food_resource: String,
    pub food_low: f64,
    pub food_buy_qty: f64,
    pub surplus_threshold: f64,
    pub currency_low: f64,
    pub surplus_sell_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcFeedbackConfig {
    pub chance: f64,
    pub evolution_rate: f64,
    pub profit_window_ticks: u64,
    pub poor_threshold: f64,
    pub rich_threshold: f64,
    pub trade_profit_weight: f64,
    pub trade_loss_weight: f64,
    pub peace_weight: f64,
    pub low_wealth_weight: f64,
    pub high_wealth_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicTraitConfig {
    pub min: f64,
    pub max: f64,
    pub profit_step: f64,
    pub loss_step: f64,
    pub decay_rate: f64,
    /// Prestige per 100 units of trade profit.
    pub prestige_gain_mult: f64,
    /// Prestige per 100 units of trade loss.
    pub prestige_loss_mult: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcConfig {
    pub count: u32,
    pub names: Vec<String>,
    pub trait_min: f64,
    pub trait_max: f64,
    pub decay_rate: f64,
    pub trait_delta: f64,
    pub low_resource_threshold: f64,
    pub personalities: BTreeMap<Personality, PersonalityProfile>,
    pub build: NpcBuildConfig,
    pub military: NpcMilitaryConfig,
    pub espionage: NpcEspionageConfig,
    pub market: NpcMarketConfig,
    pub economy: NpcEconomyConfig,
    pub feedback: NpcFeedbackConfig,
    pub economic_traits: EconomicTraitConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_content_loads() {
        let config = GameConfig::standard();
        assert_eq!(config.combat.casualty_base, 0.4);
        assert_eq!(config.npc.personalities.len(), Personality::ALL.len());
        assert!(config.building("Academy").is_some());
    }

    #[test]
    fn missing_key_fails_fast() {
        let mut value: serde_json::Value = serde_json::from_str(STANDARD_CONTENT).unwrap();
        value["combat"].as_object_mut().unwrap().remove("jitter");
        let err = GameConfig::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)), "{err}");
    }

    #[test]
    fn unknown_cost_resource_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(STANDARD_CONTENT).unwrap();
        value["training"]["troop_cost"]["mithril"] = serde_json::json!(3.0);
        let err = GameConfig::from_json_str(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("mithril"), "{err}");
    }

    #[test]
    fn missing_personality_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(STANDARD_CONTENT).unwrap();
        value["npc"]["personalities"]
            .as_object_mut()
            .unwrap()
            .remove("Opportunist");
        let err = GameConfig::from_json_str(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("Opportunist"), "{err}");
    }

    #[test]
    fn inverted_parity_band_is_rejected() {
        let mut config = GameConfig::standard();
        config.combat.parity_low = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_random_ranges_are_rejected() {
        let cases: [(&str, fn(&mut GameConfig)); 5] = [
            ("train_fraction", |c| c.npc.military.train_fraction_min = c.npc.military.train_fraction_max + 0.1),
            ("attack_fraction", |c| c.npc.military.attack_fraction_min = c.npc.military.attack_fraction_max + 0.1),
            ("jitter", |c| c.npc.build.jitter_max = c.npc.build.jitter_min - 0.1),
            ("windfall", |c| c.random_events.windfall_min = c.random_events.windfall_max + 1.0),
            ("mishap", |c| c.random_events.mishap_max = f64::NAN),
        ];
        for (name, break_it) in cases {
            let mut config = GameConfig::standard();
            break_it(&mut config);
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains(name), "{name}: {err}");
        }
    }

    #[test]
    fn inverted_range_in_an_override_file_fails_at_load() {
        let mut value: serde_json::Value = serde_json::from_str(STANDARD_CONTENT).unwrap();
        value["npc"]["military"]["attack_fraction_min"] = serde_json::json!(0.9);
        value["npc"]["military"]["attack_fraction_max"] = serde_json::json!(0.1);
        assert!(GameConfig::from_json_str(&value.to_string()).is_err());
    }
}
