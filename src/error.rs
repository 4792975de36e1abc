use crate::model::{EntityId, Shortfall};

/// Whether a rejected command was malformed or merely unaffordable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Insufficiency,
}

/// Synchronous rejection of a command. Nothing was mutated.
///
/// The `Display` text is the reason handed back to the command layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
    #[error("an entity cannot target itself")]
    SelfTarget,
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("unknown building type: {0}")]
    UnknownBuilding(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("{0} cannot be traded on the market")]
    NotTradable(String),
    #[error("{0} is already at its maximum level")]
    MaxLevel(String),
    #[error("already at war with {0}")]
    AlreadyAtWar(EntityId),
    #[error("not at war with {0}")]
    NotAtWar(EntityId),
    #[error("a recent forced peace with {0} prevents declaring war yet")]
    WarCooldown(EntityId),
    #[error("{0}")]
    Resources(#[from] Shortfall),
    #[error("not enough population: need {needed}, have {held}")]
    Population { needed: u32, held: u32 },
    #[error("not enough troops: need {needed}, have {held}")]
    Troops { needed: u32, held: u32 },
    #[error("no spies available")]
    NoSpies,
    #[error("capacity exceeded: {current} held + {queued} queued + {requested} requested > {cap}")]
    Capacity {
        current: u32,
        queued: u32,
        requested: u32,
        cap: u32,
    },
    #[error("market supply of {resource} is too low: {available} available")]
    MarketSupply { resource: String, available: f64 },
}

impl CommandError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CommandError::UnknownEntity(_)
            | CommandError::SelfTarget
            | CommandError::NonPositiveAmount
            | CommandError::UnknownBuilding(_)
            | CommandError::UnknownResource(_)
            | CommandError::NotTradable(_)
            | CommandError::MaxLevel(_)
            | CommandError::AlreadyAtWar(_)
            | CommandError::NotAtWar(_)
            | CommandError::WarCooldown(_) => ErrorCategory::Validation,
            CommandError::Resources(_)
            | CommandError::Population { .. }
            | CommandError::Troops { .. }
            | CommandError::NoSpies
            | CommandError::Capacity { .. }
            | CommandError::MarketSupply { .. } => ErrorCategory::Insufficiency,
        }
    }

    pub fn is_insufficiency(&self) -> bool {
        self.category() == ErrorCategory::Insufficiency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_converts_to_insufficiency() {
        let err: CommandError = Shortfall {
            resource: "gold".into(),
            needed: 50.0,
            held: 8.0,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Insufficiency);
        assert_eq!(err.to_string(), "not enough gold: need 50, have 8");
    }

    #[test]
    fn self_target_is_validation() {
        assert_eq!(CommandError::SelfTarget.category(), ErrorCategory::Validation);
    }
}
