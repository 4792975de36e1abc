//! Notification sink: fire-and-forget messages to a player or NPC.
//!
//! Delivery failures are swallowed; a notification never fails the operation
//! that produced it.

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use crate::model::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub entity: EntityId,
    pub text: String,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, entity: EntityId, text: &str);
}

/// Writes every notification to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, entity: EntityId, text: &str) {
        tracing::info!(category = "NOTIFY", entity, "{text}");
    }
}

/// Forwards notifications to a session layer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, entity: EntityId, text: &str) {
        let sent = self.tx.send(Notification {
            entity,
            text: text.to_string(),
        });
        if sent.is_err() {
            tracing::debug!(category = "NOTIFY", entity, "receiver gone, dropping notification");
        }
    }
}

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn for_entity(&self, entity: EntityId) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|n| n.entity == entity)
            .map(|n| n.text.clone())
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, entity: EntityId, text: &str) {
        self.sent.lock().push(Notification {
            entity,
            text: text.to_string(),
        });
    }
}
