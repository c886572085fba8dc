use bevy::prelude::*;

mod core;
mod effects;
mod interaction;
mod npc;
mod player;
mod ui;
mod world;

use crate::{
    core::CorePlugin, effects::EffectsPlugin, interaction::InteractionPlugin, npc::NpcPlugin,
    player::PlayerPlugin, ui::SpeechBubblePlugin, world::WorldPlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Rosefield".into(),
                    ..default()
                }),
                ..default()
            }),
            CorePlugin::default(), // Settings must exist before the plugins below build
            WorldPlugin,
            NpcPlugin,
            PlayerPlugin,
            InteractionPlugin,
            SpeechBubblePlugin,
            EffectsPlugin,
        ))
        .run();
}
