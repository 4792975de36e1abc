use std::collections::BTreeMap;

use super::{RecordStore, RelationRow, StoreSnapshot, SupplyRow};
use crate::IdGenerator;
use crate::model::{
    AttackId, AttackRecord, BattleOutcome, Entity, EntityId, EntityKind, IntelReport, Job, JobId,
    JobKind, JobPayload, JobStatus, PairKey, Relation, Timestamp, TradeRecord, War, WarId,
    WarStatus,
};

/// In-process [`RecordStore`] backed by ordered maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ids: IdGenerator,
    entities: BTreeMap<EntityId, Entity>,
    jobs: BTreeMap<JobId, Job>,
    attacks: BTreeMap<AttackId, AttackRecord>,
    wars: BTreeMap<WarId, War>,
    relations: BTreeMap<PairKey, Relation>,
    market: BTreeMap<String, f64>,
    intel: BTreeMap<(EntityId, EntityId), IntelReport>,
    trades: Vec<TradeRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot. New IDs continue after the largest restored ID.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let ids = IdGenerator::after(
            snapshot
                .entities
                .iter()
                .map(|e| e.id)
                .chain(snapshot.jobs.iter().map(|j| j.id))
                .chain(snapshot.attacks.iter().map(|a| a.id))
                .chain(snapshot.wars.iter().map(|w| w.id)),
        );
        let mut store = Self {
            ids,
            entities: snapshot.entities.into_iter().map(|e| (e.id, e)).collect(),
            jobs: snapshot.jobs.into_iter().map(|j| (j.id, j)).collect(),
            attacks: snapshot.attacks.into_iter().map(|a| (a.id, a)).collect(),
            wars: snapshot.wars.into_iter().map(|w| (w.id, w)).collect(),
            relations: snapshot
                .relations
                .into_iter()
                .map(|r| (r.pair, r.relation))
                .collect(),
            market: snapshot
                .market
                .into_iter()
                .map(|r| (r.resource, r.supply))
                .collect(),
            intel: BTreeMap::new(),
            trades: snapshot.trades,
        };
        for report in snapshot.intel {
            store.record_intel(report);
        }
        store
    }
}

impl RecordStore for MemoryStore {
    fn create_entity(&mut self, kind: EntityKind, name: &str) -> EntityId {
        let id = self.ids.next_id();
        self.entities.insert(id, Entity::new(id, kind, name));
        id
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities
            .values()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    fn npc_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.is_npc())
            .map(|e| e.id)
            .collect()
    }

    fn insert_job(&mut self, owner: EntityId, payload: JobPayload, start: Timestamp) -> JobId {
        let id = self.ids.next_id();
        self.jobs.insert(
            id,
            Job {
                id,
                owner,
                payload,
                start,
                status: JobStatus::Pending,
            },
        );
        id
    }

    fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    fn pending_jobs(&self, kind: JobKind) -> Vec<Job> {
        self.jobs
            .values()
            .filter(|j| j.status == JobStatus::Pending && j.kind() == kind)
            .cloned()
            .collect()
    }

    fn pending_jobs_for(&self, owner: EntityId, kind: JobKind) -> Vec<Job> {
        self.jobs
            .values()
            .filter(|j| j.owner == owner && j.status == JobStatus::Pending && j.kind() == kind)
            .cloned()
            .collect()
    }

    fn transition_job(&mut self, id: JobId, to: JobStatus) -> bool {
        match self.jobs.get_mut(&id) {
            Some(job) if job.status == JobStatus::Pending && to.is_terminal() => {
                job.status = to;
                true
            }
            _ => false,
        }
    }

    fn insert_attack(
        &mut self,
        attacker: EntityId,
        defender: EntityId,
        troops: u32,
        start: Timestamp,
    ) -> AttackId {
        let id = self.ids.next_id();
        self.attacks.insert(
            id,
            AttackRecord {
                id,
                attacker,
                defender,
                troops,
                start,
                status: JobStatus::Pending,
                outcome: None,
            },
        );
        id
    }

    fn attack(&self, id: AttackId) -> Option<&AttackRecord> {
        self.attacks.get(&id)
    }

    fn pending_attacks(&self) -> Vec<AttackRecord> {
        self.attacks
            .values()
            .filter(|a| a.status == JobStatus::Pending)
            .cloned()
            .collect()
    }

    fn pending_attacks_between(&self, a: EntityId, b: EntityId) -> Vec<AttackRecord> {
        self.attacks
            .values()
            .filter(|r| r.status == JobStatus::Pending && r.involves_pair(a, b))
            .cloned()
            .collect()
    }

    fn transition_attack(&mut self, id: AttackId, to: JobStatus) -> bool {
        match self.attacks.get_mut(&id) {
            Some(record) if record.status == JobStatus::Pending && to.is_terminal() => {
                record.status = to;
                true
            }
            _ => false,
        }
    }

    fn complete_attack(&mut self, id: AttackId, outcome: BattleOutcome) -> bool {
        match self.attacks.get_mut(&id) {
            Some(record) if record.status == JobStatus::Pending => {
                record.status = JobStatus::Completed;
                record.outcome = Some(outcome);
                true
            }
            _ => false,
        }
    }

    fn insert_war(&mut self, attacker: EntityId, defender: EntityId, start: Timestamp) -> Option<WarId> {
        if self.active_war(attacker, defender).is_some() {
            return None;
        }
        let id = self.ids.next_id();
        self.wars.insert(
            id,
            War {
                id,
                attacker,
                defender,
                status: WarStatus::Active,
                start,
                end: None,
                forced_peace: false,
            },
        );
        Some(id)
    }

    fn active_war(&self, a: EntityId, b: EntityId) -> Option<&War> {
        let pair = PairKey::new(a, b);
        self.wars
            .values()
            .find(|w| w.is_active() && PairKey::new(w.attacker, w.defender) == pair)
    }

    fn active_wars_for(&self, entity: EntityId) -> Vec<War> {
        self.wars
            .values()
            .filter(|w| w.is_active() && w.involves(entity))
            .cloned()
            .collect()
    }

    fn wars_for(&self, entity: EntityId) -> Vec<War> {
        self.wars
            .values()
            .filter(|w| w.involves(entity))
            .cloned()
            .collect()
    }

    fn end_war(&mut self, id: WarId, at: Timestamp, forced: bool) -> bool {
        match self.wars.get_mut(&id) {
            Some(war) if war.is_active() => {
                war.status = WarStatus::Ended;
                war.end = Some(at);
                war.forced_peace = forced;
                true
            }
            _ => false,
        }
    }

    fn relation(&self, pair: PairKey) -> Relation {
        self.relations.get(&pair).copied().unwrap_or_default()
    }

    fn relation_mut(&mut self, pair: PairKey) -> &mut Relation {
        self.relations.entry(pair).or_default()
    }

    fn market_supply(&self, resource: &str) -> Option<f64> {
        self.market.get(resource).copied()
    }

    fn set_market_supply(&mut self, resource: &str, supply: f64) {
        self.market.insert(resource.to_string(), supply.max(0.0));
    }

    fn record_intel(&mut self, report: IntelReport) {
        let key = (report.owner, report.target);
        match self.intel.get(&key) {
            Some(held) if held.gathered_at > report.gathered_at => {}
            _ => {
                self.intel.insert(key, report);
            }
        }
    }

    fn intel_for(&self, owner: EntityId) -> Vec<IntelReport> {
        self.intel
            .range((owner, EntityId::MIN)..=(owner, EntityId::MAX))
            .map(|(_, report)| report.clone())
            .collect()
    }

    fn record_trade(&mut self, trade: TradeRecord) {
        self.trades.push(trade);
    }

    fn trades_for(&self, entity: EntityId, since: Timestamp) -> Vec<TradeRecord> {
        self.trades
            .iter()
            .filter(|t| t.entity == entity && t.at >= since)
            .cloned()
            .collect()
    }

    fn prune_trades(&mut self, cutoff: Timestamp) -> usize {
        let before = self.trades.len();
        self.trades.retain(|t| t.at >= cutoff);
        before - self.trades.len()
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            entities: self.entities.values().cloned().collect(),
            jobs: self.jobs.values().cloned().collect(),
            attacks: self.attacks.values().cloned().collect(),
            wars: self.wars.values().cloned().collect(),
            relations: self
                .relations
                .iter()
                .map(|(pair, relation)| RelationRow {
                    pair: *pair,
                    relation: *relation,
                })
                .collect(),
            market: self
                .market
                .iter()
                .map(|(resource, supply)| SupplyRow {
                    resource: resource.clone(),
                    supply: *supply,
                })
                .collect(),
            intel: self.intel.values().cloned().collect(),
            trades: self.trades.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TradeSide;

    #[test]
    fn job_transitions_only_from_pending() {
        let mut store = MemoryStore::new();
        let owner = store.create_entity(EntityKind::Player, "alice");
        let job = store.insert_job(owner, JobPayload::Training { amount: 3 }, Timestamp::from_secs(0));

        assert!(store.transition_job(job, JobStatus::Completed));
        assert!(!store.transition_job(job, JobStatus::Cancelled));
        assert_eq!(store.job(job).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn transition_to_pending_is_refused() {
        let mut store = MemoryStore::new();
        let owner = store.create_entity(EntityKind::Player, "alice");
        let job = store.insert_job(owner, JobPayload::SpyTraining { amount: 1 }, Timestamp::from_secs(0));
        assert!(!store.transition_job(job, JobStatus::Pending));
    }

    #[test]
    fn attack_completes_once() {
        let mut store = MemoryStore::new();
        let a = store.create_entity(EntityKind::Player, "a");
        let b = store.create_entity(EntityKind::Player, "b");
        let id = store.insert_attack(a, b, 10, Timestamp::from_secs(0));

        assert!(store.transition_attack(id, JobStatus::Cancelled));
        let outcome = BattleOutcome {
            victor: crate::model::Victor::Attacker,
            attack_power: 1.0,
            defense_power: 1.0,
            attacker_losses: 1,
            defender_losses: 1,
            defender_troops: 1,
            loot_resource: None,
            loot_amount: 0.0,
        };
        assert!(!store.complete_attack(id, outcome));
        assert_eq!(store.attack(id).unwrap().status, JobStatus::Cancelled);
    }

    #[test]
    fn at_most_one_active_war_per_pair() {
        let mut store = MemoryStore::new();
        let a = store.create_entity(EntityKind::Player, "a");
        let b = store.create_entity(EntityKind::Npc, "b");
        let war = store.insert_war(a, b, Timestamp::from_secs(0)).unwrap();
        assert!(store.insert_war(b, a, Timestamp::from_secs(5)).is_none());

        assert!(store.end_war(war, Timestamp::from_secs(10), false));
        assert!(store.insert_war(b, a, Timestamp::from_secs(11)).is_some());
        assert_eq!(store.wars_for(a).len(), 2);
    }

    #[test]
    fn intel_keeps_latest_report_per_target() {
        let mut store = MemoryStore::new();
        let report = |target, troops, at| IntelReport {
            owner: 1,
            target,
            troops,
            population: 0,
            resources: Default::default(),
            buildings: Default::default(),
            gathered_at: Timestamp::from_secs(at),
        };
        store.record_intel(report(2, 10, 5));
        store.record_intel(report(2, 30, 9));
        store.record_intel(report(3, 7, 1));

        // an older report arriving late does not replace the newer one
        store.record_intel(report(2, 99, 3));

        let intel = store.intel_for(1);
        assert_eq!(intel.len(), 2);
        assert_eq!(intel[0].troops, 30);
        assert_eq!(store.snapshot().intel.len(), 2);
    }

    #[test]
    fn pruning_drops_only_old_trades() {
        let mut store = MemoryStore::new();
        let trade = |at| TradeRecord {
            entity: 1,
            resource: "food".into(),
            side: TradeSide::Buy,
            quantity: 1.0,
            unit_price: 2.0,
            profit: 0.0,
            at: Timestamp::from_secs(at),
        };
        store.record_trade(trade(10));
        store.record_trade(trade(50));
        store.record_trade(trade(90));

        assert_eq!(store.prune_trades(Timestamp::from_secs(50)), 1);
        let kept = store.trades_for(1, Timestamp::from_secs(0));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].at, Timestamp::from_secs(50));
    }

    #[test]
    fn snapshot_restores_and_continues_ids() {
        let mut store = MemoryStore::new();
        let a = store.create_entity(EntityKind::Player, "a");
        store.relation_mut(PairKey::new(a, 9)).set_trust(-30);
        store.set_market_supply("food", 120.0);

        let mut restored = MemoryStore::from_snapshot(store.snapshot());
        assert_eq!(restored.snapshot(), store.snapshot());
        let b = restored.create_entity(EntityKind::Npc, "b");
        assert!(b > a);
    }
}
