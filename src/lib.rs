pub mod content;
pub mod db;
pub mod ecs;
pub mod error;
pub mod flush;
pub mod handle;
pub mod id;
pub mod model;
pub mod notify;
pub mod scenario;
pub mod sim;
pub mod store;

pub use content::{ContentError, GameConfig};
pub use error::{CommandError, ErrorCategory};
pub use handle::WorldHandle;
pub use id::IdGenerator;
pub use model::{
    AttackRecord, BattleOutcome, Entity, EntityId, EntityKind, IntelReport, Job, JobKind,
    JobPayload, JobStatus, Personality, Relation, SpyAction, Timestamp, TradeRecord, War,
};
pub use notify::{MemoryNotifier, Notifier, TracingNotifier};
pub use store::{MemoryStore, RecordStore, StoreHandle, StoreSnapshot};
