use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::ledger::ResourceLedger;
use super::timestamp::Timestamp;

/// Reconnaissance snapshot of a target, gathered by a successful scout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelReport {
    pub owner: EntityId,
    pub target: EntityId,
    pub troops: u32,
    pub population: u32,
    pub resources: ResourceLedger,
    pub buildings: BTreeMap<String, u32>,
    pub gathered_at: Timestamp,
}

impl IntelReport {
    pub fn total_resources(&self) -> f64 {
        self.resources.total()
    }
}
