//! Player plugin wiring spawning and movement systems.
use bevy::prelude::*;

use crate::{
    core::plugin::FrameSet,
    player::systems::{
        animate_player_sprite, draw_facing_indicator, move_player, set_move_target_from_pointer,
        spawn_player,
    },
    world::plugin::SceneSetup,
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player.after(SceneSetup))
            .add_systems(
                Update,
                (
                    set_move_target_from_pointer,
                    move_player.after(set_move_target_from_pointer),
                    animate_player_sprite.after(move_player),
                )
                    .in_set(FrameSet::Movement),
            )
            .add_systems(
                Update,
                draw_facing_indicator.in_set(FrameSet::Presentation),
            );
    }
}
