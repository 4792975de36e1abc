use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::timestamp::Timestamp;

pub type JobId = u64;

/// Deferred job categories. `Attack` jobs live in the attack collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum JobKind {
    Training,
    Construction,
    Attack,
    Espionage,
    SpyTraining,
}

string_enum!(JobKind {
    Training => "training",
    Construction => "construction",
    Attack => "attack",
    Espionage => "espionage",
    SpyTraining => "spy_training",
});

/// Lifecycle of a job or attack. Exactly one transition out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum JobStatus {
    Pending,
    Completed,
    Cancelled,
    Invalid,
}

string_enum!(JobStatus {
    Pending => "pending",
    Completed => "completed",
    Cancelled => "cancelled",
    Invalid => "invalid",
});

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        self != JobStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SpyAction {
    Scout,
    Steal,
    Sabotage,
}

string_enum!(SpyAction {
    Scout => "scout",
    Steal => "steal",
    Sabotage => "sabotage",
});

/// Immutable job payload; the variant decides the job kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobPayload {
    Training { amount: u32 },
    Construction { building: String },
    Espionage { action: SpyAction, target: EntityId },
    SpyTraining { amount: u32 },
}

impl JobPayload {
    pub fn kind(&self) -> JobKind {
        match self {
            JobPayload::Training { .. } => JobKind::Training,
            JobPayload::Construction { .. } => JobKind::Construction,
            JobPayload::Espionage { .. } => JobKind::Espionage,
            JobPayload::SpyTraining { .. } => JobKind::SpyTraining,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner: EntityId,
    pub payload: JobPayload,
    pub start: Timestamp,
    pub status: JobStatus,
}

impl Job {
    pub fn kind(&self) -> JobKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_decides_kind() {
        let p = JobPayload::Espionage {
            action: SpyAction::Scout,
            target: 4,
        };
        assert_eq!(p.kind(), JobKind::Espionage);
        assert_eq!(JobPayload::SpyTraining { amount: 2 }.kind(), JobKind::SpyTraining);
    }

    #[test]
    fn payload_serializes_with_tag() {
        let json = serde_json::to_string(&JobPayload::Training { amount: 5 }).unwrap();
        assert_eq!(json, r#"{"kind":"training","amount":5}"#);
    }
}
