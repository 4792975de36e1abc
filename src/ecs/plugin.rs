use bevy_app::{App, Plugin};

use super::systems::checkpoint::add_checkpoint_systems;
use super::systems::combat::add_combat_systems;
use super::systems::economy::add_economy_systems;
use super::systems::events::add_event_systems;
use super::systems::jobs::add_job_systems;
use super::systems::npc::add_npc_systems;

/// Installs every world tick system.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        add_job_systems(app);
        add_economy_systems(app);
        add_combat_systems(app);
        add_event_systems(app);
        add_npc_systems(app);
        add_checkpoint_systems(app);
    }
}
