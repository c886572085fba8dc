//! NPC plugin wiring the NPC spawner.
use bevy::prelude::*;

use crate::{npc::systems::spawn_npc, world::plugin::SceneSetup};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_npc.after(SceneSetup));
    }
}
