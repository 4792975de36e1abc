use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ledger::ResourceLedger;
use super::timestamp::Timestamp;
use super::traits::NpcState;

pub type EntityId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EntityKind {
    Player,
    Npc,
}

string_enum!(EntityKind {
    Player => "player",
    Npc => "npc",
});

/// Stats derived from owned buildings. Fully recomputed every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub attack_mult: f64,
    pub defense_mult: f64,
    pub population_growth: f64,
    /// Resource → extra units produced per tick.
    pub production: BTreeMap<String, f64>,
}

impl Default for DerivedStats {
    fn default() -> Self {
        Self {
            attack_mult: 1.0,
            defense_mult: 1.0,
            population_growth: 0.0,
            production: BTreeMap::new(),
        }
    }
}

/// A city owned by a player or an NPC faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    /// Garrison: troops at home, not deployed on an attack.
    pub troops: u32,
    pub max_troops: u32,
    pub spies: u32,
    pub population: u32,
    pub max_population: u32,
    pub resources: ResourceLedger,
    /// Building name → level.
    pub buildings: BTreeMap<String, u32>,
    pub stats: DerivedStats,
    pub battles_won: u32,
    pub prestige: f64,
    pub last_active: Timestamp,
    pub npc: Option<NpcState>,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            troops: 0,
            max_troops: 0,
            spies: 0,
            population: 0,
            max_population: 0,
            resources: ResourceLedger::new(),
            buildings: BTreeMap::new(),
            stats: DerivedStats::default(),
            battles_won: 0,
            prestige: 0.0,
            last_active: Timestamp::default(),
            npc: None,
        }
    }

    pub fn is_npc(&self) -> bool {
        self.npc.is_some()
    }

    pub fn building_level(&self, building: &str) -> u32 {
        self.buildings.get(building).copied().unwrap_or(0)
    }

    pub fn total_building_levels(&self) -> u32 {
        self.buildings.values().sum()
    }

    /// Fraction of population capacity in use (0 when uncapped).
    pub fn population_fill(&self) -> f64 {
        if self.max_population == 0 {
            0.0
        } else {
            f64::from(self.population) / f64::from(self.max_population)
        }
    }

    /// Fraction of troop capacity in use (0 when uncapped).
    pub fn troop_fill(&self) -> f64 {
        if self.max_troops == 0 {
            0.0
        } else {
            f64::from(self.troops) / f64::from(self.max_troops)
        }
    }
}
