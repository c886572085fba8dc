//! WorldPlugin derives the world bounds and layout and spawns the static scenery.
use bevy::prelude::*;

use crate::world::systems::{init_scene_layout, resolve_scene_assets, spawn_camera, spawn_scenery};

/// Startup set after which `WorldBounds`, `SceneLayout` and `SceneAssets` exist.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneSetup;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (
                init_scene_layout,
                resolve_scene_assets,
                spawn_camera,
                spawn_scenery,
            )
                .chain()
                .in_set(SceneSetup),
        );
    }
}
