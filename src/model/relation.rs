use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::timestamp::Timestamp;

pub const TRUST_MIN: i32 = -100;
pub const TRUST_MAX: i32 = 100;

/// Unordered entity pair. `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub low: EntityId,
    pub high: EntityId,
}

impl PairKey {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.low == entity || self.high == entity
    }
}

/// Symmetric relationship between two entities. Never removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub trust: i32,
    /// No new war between the pair before this instant.
    pub war_cooldown_until: Option<Timestamp>,
}

impl Relation {
    /// Apply a trust delta, clamped to `[TRUST_MIN, TRUST_MAX]`. Returns the new value.
    pub fn adjust_trust(&mut self, delta: i32) -> i32 {
        self.trust = self.trust.saturating_add(delta).clamp(TRUST_MIN, TRUST_MAX);
        self.trust
    }

    pub fn set_trust(&mut self, value: i32) -> i32 {
        self.trust = value.clamp(TRUST_MIN, TRUST_MAX);
        self.trust
    }

    pub fn on_cooldown(&self, now: Timestamp) -> bool {
        self.war_cooldown_until.is_some_and(|until| now < until)
    }
}
