#[macro_use]
mod macros;

pub mod attack;
pub mod entity;
pub mod intel;
pub mod job;
pub mod ledger;
pub mod relation;
pub mod timestamp;
pub mod trade;
pub mod traits;
pub mod war;

pub use attack::{AttackId, AttackRecord, BattleOutcome, Victor};
pub use entity::{DerivedStats, Entity, EntityId, EntityKind};
pub use intel::IntelReport;
pub use job::{Job, JobId, JobKind, JobPayload, JobStatus, SpyAction};
pub use ledger::{Cost, ResourceLedger, Shortfall, scale_cost};
pub use relation::{PairKey, Relation, TRUST_MAX, TRUST_MIN};
pub use timestamp::Timestamp;
pub use trade::{TradeRecord, TradeSide};
pub use traits::{NpcState, Personality, SleepCycle, TraitVector};
pub use war::{War, WarId, WarStatus};
