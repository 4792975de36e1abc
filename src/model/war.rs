use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::timestamp::Timestamp;

pub type WarId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum WarStatus {
    Active,
    Ended,
}

string_enum!(WarStatus {
    Active => "active",
    Ended => "ended",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct War {
    pub id: WarId,
    pub attacker: EntityId,
    pub defender: EntityId,
    pub status: WarStatus,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    /// Set when peace came before the minimum war duration.
    pub forced_peace: bool,
}

impl War {
    pub fn is_active(&self) -> bool {
        self.status == WarStatus::Active
    }

    pub fn involves(&self, entity: EntityId) -> bool {
        self.attacker == entity || self.defender == entity
    }

    /// The other side of this war, if `entity` is a participant.
    pub fn opponent_of(&self, entity: EntityId) -> Option<EntityId> {
        if self.attacker == entity {
            Some(self.defender)
        } else if self.defender == entity {
            Some(self.attacker)
        } else {
            None
        }
    }
}
