//! Systems related to NPC spawning.
use bevy::prelude::*;

use crate::{
    core::settings::VignetteSettings,
    npc::components::{Identity, Npc, NpcHitRegion},
    world::components::SceneLayout,
};

const NPC_COLOR: Color = Color::srgb_u8(100, 90, 140);

/// Spawns the NPC placeholder to the right of the roses.
pub fn spawn_npc(
    mut commands: Commands,
    layout: Res<SceneLayout>,
    settings: Res<VignetteSettings>,
) {
    let size = settings.npc.size;
    let identity = Identity::new(settings.dialogue.npc_name.clone());

    info!(
        "Spawning NPC {} at ({:.0}, {:.0})",
        identity.display_name, layout.npc_center.x, layout.npc_center.y
    );

    commands.spawn((
        Sprite::from_color(NPC_COLOR, Vec2::splat(size)),
        Transform::from_translation(layout.npc_center.extend(4.0)),
        Npc,
        NpcHitRegion::from_size(size),
        Name::new(identity.display_name.clone()),
        identity,
    ));
}
