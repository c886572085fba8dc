// src/ui/speech_bubble/plugin.rs
//
// Plugin registration for speech bubble systems.

use bevy::prelude::*;

use crate::{core::plugin::FrameSet, world::plugin::SceneSetup};

use super::components::{NpcBubbleState, PlayerBubbleState};
use super::events::TypewriterFinished;
use super::systems::{
    advance_typewriters, animate_bubble_pop_in, fade_choice_labels, spawn_speech_bubbles,
    update_npc_bubble, update_player_bubble,
};

/// Plugin providing the NPC and player speech bubbles.
///
/// # System Ordering
///
/// All systems run in `FrameSet::Presentation`, after the choice controller has
/// written its messages for the frame:
///
/// 1. `update_npc_bubble` / `update_player_bubble` - pick lines, restart typewriters
/// 2. `advance_typewriters` - reveal characters, write `TypewriterFinished`
/// 3. `animate_bubble_pop_in` / `fade_choice_labels` - apply fades
pub struct SpeechBubblePlugin;

impl Plugin for SpeechBubblePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NpcBubbleState>()
            .init_resource::<PlayerBubbleState>()
            .add_message::<TypewriterFinished>()
            .add_systems(Startup, spawn_speech_bubbles.after(SceneSetup))
            .add_systems(
                Update,
                (
                    (update_npc_bubble, update_player_bubble),
                    advance_typewriters,
                    (animate_bubble_pop_in, fade_choice_labels),
                )
                    .chain()
                    .in_set(FrameSet::Presentation),
            );

        info!("SpeechBubblePlugin registered");
    }
}
