use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::job::JobStatus;
use super::timestamp::Timestamp;

pub type AttackId = u64;

/// Which branch a battle resolved through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Victor {
    Attacker,
    Defender,
    Blended,
}

string_enum!(Victor {
    Attacker => "attacker",
    Defender => "defender",
    Blended => "blended",
});

/// Persisted result of a resolved battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub victor: Victor,
    pub attack_power: f64,
    pub defense_power: f64,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    /// Garrison size the defender fought with.
    pub defender_troops: u32,
    pub loot_resource: Option<String>,
    pub loot_amount: f64,
}

impl BattleOutcome {
    pub fn attacker_prevailed(&self) -> bool {
        self.attack_power >= self.defense_power
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRecord {
    pub id: AttackId,
    pub attacker: EntityId,
    pub defender: EntityId,
    pub troops: u32,
    pub start: Timestamp,
    pub status: JobStatus,
    pub outcome: Option<BattleOutcome>,
}

impl AttackRecord {
    /// True when this attack runs between `a` and `b` in either direction.
    pub fn involves_pair(&self, a: EntityId, b: EntityId) -> bool {
        (self.attacker == a && self.defender == b) || (self.attacker == b && self.defender == a)
    }
}
