//! Record Store: durable keyed storage for every simulation collection.
//!
//! Components never hold state of their own; they read and write through a
//! [`RecordStore`]. Status changes on jobs and attacks are conditional
//! "from pending only" transitions, so two paths racing on the same record
//! resolve to exactly one winner.

mod memory;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;

use crate::model::{
    AttackId, AttackRecord, BattleOutcome, Entity, EntityId, EntityKind, IntelReport, Job, JobId,
    JobKind, JobPayload, JobStatus, PairKey, Relation, Timestamp, TradeRecord, War, WarId,
};

/// Shared, lockable store handle. Holding the lock is the transaction boundary.
pub type StoreHandle = Arc<Mutex<dyn RecordStore>>;

/// Wrap a store in a [`StoreHandle`].
pub fn shared<S: RecordStore + 'static>(store: S) -> StoreHandle {
    Arc::new(Mutex::new(store))
}

pub trait RecordStore: Send {
    // --- Entities ---
    fn create_entity(&mut self, kind: EntityKind, name: &str) -> EntityId;
    fn entity(&self, id: EntityId) -> Option<&Entity>;
    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity>;
    fn entity_by_name(&self, name: &str) -> Option<&Entity>;
    fn entity_ids(&self) -> Vec<EntityId>;
    fn npc_ids(&self) -> Vec<EntityId>;

    // --- Jobs ---
    fn insert_job(&mut self, owner: EntityId, payload: JobPayload, start: Timestamp) -> JobId;
    fn job(&self, id: JobId) -> Option<&Job>;
    fn pending_jobs(&self, kind: JobKind) -> Vec<Job>;
    fn pending_jobs_for(&self, owner: EntityId, kind: JobKind) -> Vec<Job>;
    /// Move a pending job to `to`. Returns false if it was not pending.
    fn transition_job(&mut self, id: JobId, to: JobStatus) -> bool;

    // --- Attacks ---
    fn insert_attack(
        &mut self,
        attacker: EntityId,
        defender: EntityId,
        troops: u32,
        start: Timestamp,
    ) -> AttackId;
    fn attack(&self, id: AttackId) -> Option<&AttackRecord>;
    fn pending_attacks(&self) -> Vec<AttackRecord>;
    fn pending_attacks_between(&self, a: EntityId, b: EntityId) -> Vec<AttackRecord>;
    /// Move a pending attack to `to`. Returns false if it was not pending.
    fn transition_attack(&mut self, id: AttackId, to: JobStatus) -> bool;
    /// Complete a pending attack with its outcome. Returns false if it was not pending.
    fn complete_attack(&mut self, id: AttackId, outcome: BattleOutcome) -> bool;

    // --- Wars ---
    /// Start a war. Returns `None` if the pair already has an active war.
    fn insert_war(&mut self, attacker: EntityId, defender: EntityId, start: Timestamp) -> Option<WarId>;
    fn active_war(&self, a: EntityId, b: EntityId) -> Option<&War>;
    fn active_wars_for(&self, entity: EntityId) -> Vec<War>;
    fn wars_for(&self, entity: EntityId) -> Vec<War>;
    /// End an active war. Returns false if it was not active.
    fn end_war(&mut self, id: WarId, at: Timestamp, forced: bool) -> bool;

    // --- Trust ---
    fn relation(&self, pair: PairKey) -> Relation;
    fn relation_mut(&mut self, pair: PairKey) -> &mut Relation;

    // --- Market ---
    fn market_supply(&self, resource: &str) -> Option<f64>;
    /// Store a supply level, clamped at zero.
    fn set_market_supply(&mut self, resource: &str, supply: f64);

    // --- Intel and trades ---
    /// Keep `report` unless a newer one for the same owner and target is already held.
    fn record_intel(&mut self, report: IntelReport);
    /// Latest report per target gathered by `owner`.
    fn intel_for(&self, owner: EntityId) -> Vec<IntelReport>;
    fn record_trade(&mut self, trade: TradeRecord);
    fn trades_for(&self, entity: EntityId, since: Timestamp) -> Vec<TradeRecord>;
    /// Drop trades made before `cutoff`. Returns how many were dropped.
    fn prune_trades(&mut self, cutoff: Timestamp) -> usize;

    fn snapshot(&self) -> StoreSnapshot;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRow {
    pub pair: PairKey,
    pub relation: Relation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyRow {
    pub resource: String,
    pub supply: f64,
}

/// Point-in-time copy of every collection, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub entities: Vec<Entity>,
    pub jobs: Vec<Job>,
    pub attacks: Vec<AttackRecord>,
    pub wars: Vec<War>,
    pub relations: Vec<RelationRow>,
    pub market: Vec<SupplyRow>,
    pub intel: Vec<IntelReport>,
    pub trades: Vec<TradeRecord>,
}
