//! Systems for spawning and moving the player.
use bevy::prelude::*;

use crate::{
    core::{
        input::PointerPresses,
        plugin::FrameClock,
        settings::VignetteSettings,
    },
    player::components::{Facing, MoveTarget, Player, PlayerBody, PlayerMotion},
    world::components::{Appearance, PlaceholderShape, SceneAssets, SceneLayout, WorldBounds},
};

const INDICATOR_OFFSET: f32 = 14.0;
const INDICATOR_SIZE: f32 = 6.0;
const INDICATOR_IDLE: Color = Color::srgb_u8(220, 220, 180);
const INDICATOR_MOVING: Color = Color::srgb_u8(255, 255, 200);

const UP_KEYS: [KeyCode; 2] = [KeyCode::ArrowUp, KeyCode::KeyW];
const DOWN_KEYS: [KeyCode; 2] = [KeyCode::ArrowDown, KeyCode::KeyS];
const LEFT_KEYS: [KeyCode; 2] = [KeyCode::ArrowLeft, KeyCode::KeyA];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::ArrowRight, KeyCode::KeyD];

/// Spawns the player at the start of the path using the resolved appearance.
pub fn spawn_player(
    mut commands: Commands,
    layout: Res<SceneLayout>,
    assets: Res<SceneAssets>,
    settings: Res<VignetteSettings>,
) {
    let size = Vec2::splat(settings.player.size);
    let sprite = match &assets.player {
        Appearance::Placeholder(PlaceholderShape::Rect { size, color }) => {
            Sprite::from_color(*color, *size)
        }
        Appearance::Animated(sheet) => {
            let mut sprite = Sprite::from_atlas_image(
                sheet.image.clone(),
                TextureAtlas {
                    layout: sheet.layout.clone(),
                    index: Facing::default().sheet_row() * sheet.columns,
                },
            );
            sprite.custom_size = Some(size);
            sprite
        }
    };

    commands.spawn((
        sprite,
        Transform::from_translation(layout.player_spawn.extend(5.0)),
        Player,
        PlayerBody {
            offset: settings.player.body_offset,
            half_extent: size * 0.5,
        },
        Facing::default(),
        PlayerMotion::default(),
        MoveTarget::default(),
        Name::new("Player"),
    ));

    info!(
        "Player spawned at ({:.0}, {:.0})",
        layout.player_spawn.x, layout.player_spawn.y
    );
}

/// Sets a walk destination from clicks (desktop) or taps (touch).
///
/// Presses claimed by a tap commit are skipped.
pub fn set_move_target_from_pointer(
    presses: Res<PointerPresses>,
    mut players: Query<(&PlayerBody, &mut MoveTarget), With<Player>>,
) {
    if presses.is_claimed() {
        return;
    }
    let Some(world) = presses.latest() else {
        return;
    };
    let Ok((body, mut target)) = players.single_mut() else {
        return;
    };

    // Aim the body centre at the pointer.
    target.0 = Some(world - body.offset);
}

/// Moves the player from held keys or toward the pointer target, clamped to the world.
pub fn move_player(
    clock: Res<FrameClock>,
    settings: Res<VignetteSettings>,
    bounds: Res<WorldBounds>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut players: Query<
        (
            &mut Transform,
            &PlayerBody,
            &mut MoveTarget,
            &mut Facing,
            &mut PlayerMotion,
        ),
        With<Player>,
    >,
) {
    let Ok((mut transform, body, mut target, mut facing, mut motion)) = players.single_mut()
    else {
        return;
    };

    let delta = clock.delta_secs();
    let max_step = settings.player.speed * delta;
    let current = transform.translation.truncate();
    let direction = key_direction(|key| keyboard.pressed(key));

    let next = if direction != Vec2::ZERO {
        target.0 = None;
        current + direction * max_step
    } else if let Some(destination) = target.0 {
        let (next, arrived) = step_toward(
            current,
            destination,
            max_step,
            settings.player.arrive_distance,
        );
        if arrived {
            target.0 = None;
        }
        next
    } else {
        current
    };

    let next = bounds.clamp_inside(next, body.half_extent);
    let moved = next - current;
    motion.moving = moved.length_squared() > f32::EPSILON;
    if let Some(new_facing) = Facing::from_direction(moved) {
        *facing = new_facing;
    }

    transform.translation.x = next.x;
    transform.translation.y = next.y;
}

/// Cycles walk frames on the sprite sheet when one is in use.
pub fn animate_player_sprite(
    clock: Res<FrameClock>,
    assets: Res<SceneAssets>,
    mut players: Query<(&mut Sprite, &Facing, &mut PlayerMotion), With<Player>>,
) {
    let Appearance::Animated(sheet) = &assets.player else {
        return;
    };
    let Ok((mut sprite, facing, mut motion)) = players.single_mut() else {
        return;
    };

    if motion.moving {
        let delta = std::time::Duration::from_secs_f32(clock.delta_secs());
        if motion.frame_timer.tick(delta).just_finished() {
            motion.frame = (motion.frame + 1) % sheet.columns.max(1);
        }
    } else {
        motion.frame = 0;
        motion.frame_timer.reset();
    }

    if let Some(atlas) = sprite.texture_atlas.as_mut() {
        atlas.index = facing.sheet_row() * sheet.columns + motion.frame;
    }
}

/// Draws the facing triangle over placeholder players.
pub fn draw_facing_indicator(
    assets: Res<SceneAssets>,
    players: Query<(&Transform, &Facing, &PlayerMotion), With<Player>>,
    mut gizmos: Gizmos,
) {
    if !assets.player.is_placeholder() {
        return;
    }
    let Ok((transform, facing, motion)) = players.single() else {
        return;
    };

    let [a, b, c] = indicator_triangle(transform.translation.truncate(), *facing);
    let color = if motion.moving {
        INDICATOR_MOVING
    } else {
        INDICATOR_IDLE
    };
    gizmos.linestrip_2d([a, b, c, a], color);
}

/// Unit-length (or zero) direction from the movement keys.
pub fn key_direction(pressed: impl Fn(KeyCode) -> bool) -> Vec2 {
    let any = |keys: [KeyCode; 2]| keys.iter().any(|key| pressed(*key));
    let mut direction = Vec2::ZERO;
    if any(UP_KEYS) {
        direction += Vec2::Y;
    }
    if any(DOWN_KEYS) {
        direction -= Vec2::Y;
    }
    if any(LEFT_KEYS) {
        direction -= Vec2::X;
    }
    if any(RIGHT_KEYS) {
        direction += Vec2::X;
    }
    direction.normalize_or_zero()
}

/// Moves at most `max_step` toward `target`; reports arrival within `arrive_distance`.
pub fn step_toward(
    current: Vec2,
    target: Vec2,
    max_step: f32,
    arrive_distance: f32,
) -> (Vec2, bool) {
    let offset = target - current;
    let distance = offset.length();
    if distance <= arrive_distance.max(max_step) {
        return (target, true);
    }
    (current + offset / distance * max_step, false)
}

/// Triangle pointing in the facing direction, offset from the player centre.
pub fn indicator_triangle(center: Vec2, facing: Facing) -> [Vec2; 3] {
    let forward = facing.unit();
    let side = forward.perp();
    let tip_base = center + forward * INDICATOR_OFFSET;
    [
        tip_base + forward * INDICATOR_SIZE,
        tip_base - forward * INDICATOR_SIZE + side * INDICATOR_SIZE,
        tip_base - forward * INDICATOR_SIZE - side * INDICATOR_SIZE,
    ]
}
