use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use parking_lot::RwLock;

use crate::content::GameConfig;
use crate::notify::Notifier;
use crate::sim::{TradeCooldowns, WorldEventState};
use crate::store::StoreHandle;

/// Record Store shared with the command layer.
#[derive(Resource, Clone)]
pub struct SharedStore(pub StoreHandle);

#[derive(Resource, Clone)]
pub struct Content(pub Arc<GameConfig>);

#[derive(Resource, Clone)]
pub struct Notifications(pub Arc<dyn Notifier>);

/// Active world events, readable by player trades between ticks.
pub type SharedEvents = Arc<RwLock<WorldEventState>>;

#[derive(Resource, Clone, Default)]
pub struct WorldEvents(pub SharedEvents);

/// Per-process NPC market cooldowns.
#[derive(Resource, Debug, Default)]
pub struct NpcCooldowns(pub TradeCooldowns);

/// Runtime settings, separate from game content.
#[derive(Resource, Debug, Clone)]
pub struct WorldConfig {
    pub seed: u64,
    /// Write a checkpoint every this many ticks; 0 disables checkpoints.
    pub flush_every: u64,
    pub output_dir: Option<PathBuf>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            flush_every: 0,
            output_dir: None,
        }
    }
}

/// What the last tick did. Reset at the start of every tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub tick: u64,
    pub npcs_created: usize,
    pub jobs_completed: usize,
    pub jobs_invalid: usize,
    pub battles: usize,
    pub world_event_started: Option<String>,
    pub npcs_awake: usize,
    pub npcs_asleep: usize,
    pub npc_actions: usize,
}
