use serde::{Deserialize, Serialize};

use super::timestamp::Timestamp;

/// NPC archetype fixing baseline behavior probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Personality {
    Aggressor,
    Defender,
    Economist,
    Opportunist,
}

string_enum!(Personality {
    Aggressor => "Aggressor",
    Defender => "Defender",
    Economist => "Economist",
    Opportunist => "Opportunist",
});

/// Live behavior probabilities of an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitVector {
    pub attack_chance: f64,
    pub build_chance: f64,
    pub peace_chance: f64,
}

impl TraitVector {
    pub fn new(attack_chance: f64, build_chance: f64, peace_chance: f64) -> Self {
        Self {
            attack_chance,
            build_chance,
            peace_chance,
        }
    }

    /// Clamp every component into `[lo, hi]`.
    pub fn clamp(&mut self, lo: f64, hi: f64) {
        self.attack_chance = self.attack_chance.clamp(lo, hi);
        self.build_chance = self.build_chance.clamp(lo, hi);
        self.peace_chance = self.peace_chance.clamp(lo, hi);
    }

    /// Largest absolute component difference.
    pub fn distance(&self, other: &TraitVector) -> f64 {
        (self.attack_chance - other.attack_chance)
            .abs()
            .max((self.build_chance - other.build_chance).abs())
            .max((self.peace_chance - other.peace_chance).abs())
    }
}

/// Awake/asleep phase of an NPC. A cycle with no end time has not started yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepCycle {
    pub awake: bool,
    pub phase_ends_at: Option<Timestamp>,
}

/// NPC-only state carried on an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcState {
    pub personality: Personality,
    pub traits: TraitVector,
    /// Scales sell thresholds; bounded by the configured economic trait range.
    pub greed: f64,
    /// Scales trade size; bounded by the configured economic trait range.
    pub risk: f64,
    pub cycle: SleepCycle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personality_round_trips_through_string() {
        for p in Personality::ALL {
            assert_eq!(Personality::try_from(p.to_string()).unwrap(), *p);
        }
        assert!(Personality::try_from("Pacifist".to_string()).is_err());
    }

    #[test]
    fn clamp_bounds_every_component() {
        let mut t = TraitVector::new(1.4, -0.2, 0.5);
        t.clamp(0.05, 0.95);
        assert_eq!(t, TraitVector::new(0.95, 0.05, 0.5));
    }
}
