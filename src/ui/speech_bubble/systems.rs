// src/ui/speech_bubble/systems.rs
//
// Systems for spawning, updating and animating the NPC and player speech bubbles.

use bevy::{prelude::*, text::TextBounds};

use crate::{
    core::{plugin::FrameClock, settings::VignetteSettings},
    interaction::{
        components::{Choice, ChoiceLabel},
        events::ChoiceSelected,
        state::InteractionState,
    },
    npc::components::{Identity, Npc, NpcHitRegion},
    player::components::{Player, PlayerBody},
    world::components::{SceneAssets, SceneLayout, WorldBounds},
};

use super::{
    components::{
        npc_bubble_anchor, npc_bubble_visible, npc_line_for, player_bubble_anchor, pop_in_scale,
        tail_height, BubbleMetrics, BubblePart, BubbleSpeaker, BubbleText, NpcBubbleState, NpcLine,
        PlayerBubbleState, SpeechBubble,
    },
    events::TypewriterFinished,
    typewriter::{Typewriter, TypewriterStep},
};

// Visual constants
const BORDER_COLOR: Color = Color::srgb_u8(80, 60, 80);
const BODY_COLOR: Color = Color::srgb_u8(255, 255, 255);
const NAME_TAG_COLOR: Color = Color::srgb_u8(200, 70, 100);
const NAME_TEXT_COLOR: Color = Color::srgb_u8(255, 255, 255);
const MESSAGE_COLOR: Color = Color::srgb_u8(60, 40, 60);
const BORDER_WIDTH: f32 = 2.0;
const PADDING_X: f32 = 6.0;
const BUBBLE_Z: f32 = 10.0;

/// Spawns both bubble hierarchies, hidden, with their typewriters idle.
pub fn spawn_speech_bubbles(
    mut commands: Commands,
    settings: Res<VignetteSettings>,
    bounds: Res<WorldBounds>,
    layout: Res<SceneLayout>,
    assets: Res<SceneAssets>,
) {
    let metrics = BubbleMetrics::for_world_width(bounds.width());
    let pop_in = settings.dialogue.pop_in_seconds;

    let npc_anchor = npc_bubble_anchor(
        &bounds,
        layout.npc_center,
        settings.npc.size * 0.5,
        metrics.npc_size,
    );
    spawn_bubble(
        &mut commands,
        &assets,
        BubbleSpeaker::Npc,
        npc_anchor,
        metrics.npc_size,
        metrics.font_size,
        Typewriter::new(settings.dialogue.npc_char_interval),
        pop_in,
        Some((settings.dialogue.npc_name.as_str(), metrics.name_font_size)),
    );

    spawn_bubble(
        &mut commands,
        &assets,
        BubbleSpeaker::Player,
        layout.player_spawn + settings.dialogue.player_bubble_offset,
        metrics.player_size,
        metrics.font_size,
        Typewriter::new(settings.dialogue.player_char_interval),
        pop_in,
        None,
    );

    commands.insert_resource(metrics);
    info!(
        "Speech bubbles spawned (NPC bubble at ({:.0}, {:.0}))",
        npc_anchor.x, npc_anchor.y
    );
}

#[allow(clippy::too_many_arguments)]
fn spawn_bubble(
    commands: &mut Commands,
    assets: &SceneAssets,
    speaker: BubbleSpeaker,
    anchor: Vec2,
    size: Vec2,
    font_size: f32,
    typewriter: Typewriter,
    pop_in_seconds: f32,
    name_tag: Option<(&str, f32)>,
) {
    let part = |base_color: Color| BubblePart {
        speaker,
        base_color,
    };
    let hidden = |color: Color| color.with_alpha(0.0);
    let tail_size = Vec2::splat(tail_height() * 1.4);
    let tail_y = -size.y * 0.5;

    commands
        .spawn((
            Transform::from_translation(anchor.extend(BUBBLE_Z))
                .with_scale(Vec3::splat(pop_in_scale(0.0))),
            Visibility::default(),
            SpeechBubble {
                speaker,
                fade: crate::core::fade::Fade::hidden(pop_in_seconds),
            },
            Name::new(format!("{:?} Speech Bubble", speaker)),
        ))
        .with_children(|bubble| {
            bubble.spawn((
                Sprite::from_color(hidden(BORDER_COLOR), size + Vec2::splat(BORDER_WIDTH * 2.0)),
                Transform::from_xyz(0.0, 0.0, 0.0),
                part(BORDER_COLOR),
            ));
            bubble.spawn((
                Sprite::from_color(
                    hidden(BORDER_COLOR),
                    tail_size + Vec2::splat(BORDER_WIDTH * 2.0),
                ),
                Transform::from_xyz(0.0, tail_y, -0.1)
                    .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4)),
                part(BORDER_COLOR),
            ));
            bubble.spawn((
                Sprite::from_color(hidden(BODY_COLOR), size),
                Transform::from_xyz(0.0, 0.0, 0.1),
                part(BODY_COLOR),
            ));
            bubble.spawn((
                Sprite::from_color(hidden(BODY_COLOR), tail_size),
                Transform::from_xyz(0.0, tail_y, 0.15)
                    .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4)),
                part(BODY_COLOR),
            ));
            bubble.spawn((
                Text2d::new(""),
                assets.text_font(font_size),
                TextColor(hidden(MESSAGE_COLOR)),
                TextBounds::new_horizontal(size.x - PADDING_X * 2.0),
                Transform::from_xyz(0.0, -2.0, 0.5),
                part(MESSAGE_COLOR),
                BubbleText { speaker },
                typewriter,
            ));

            if let Some((name, name_size)) = name_tag {
                let tag_size = Vec2::new(
                    name_size * name.chars().count() as f32 * 0.7 + 16.0,
                    name_size + 10.0,
                );
                let tag_position = Vec2::new(
                    -size.x * 0.5 + tag_size.x * 0.5 + 6.0,
                    size.y * 0.5 + tag_size.y * 0.5 - 2.0,
                );
                bubble.spawn((
                    Sprite::from_color(hidden(NAME_TAG_COLOR), tag_size),
                    Transform::from_translation(tag_position.extend(0.3)),
                    part(NAME_TAG_COLOR),
                ));
                bubble.spawn((
                    Text2d::new(name),
                    assets.text_font(name_size),
                    TextColor(hidden(NAME_TEXT_COLOR)),
                    Transform::from_translation(tag_position.extend(0.4)),
                    part(NAME_TEXT_COLOR),
                ));
            }
        });
}

/// Chooses the NPC line, restarts its typewriter on change, and eases the bubble.
#[allow(clippy::too_many_arguments)]
pub fn update_npc_bubble(
    clock: Res<FrameClock>,
    settings: Res<VignetteSettings>,
    layout: Res<SceneLayout>,
    mut state: ResMut<NpcBubbleState>,
    mut selections: MessageReader<ChoiceSelected>,
    players: Query<(&Transform, &PlayerBody), With<Player>>,
    npcs: Query<(&Transform, &NpcHitRegion, &Identity), (With<Npc>, Without<Player>)>,
    mut bubbles: Query<&mut SpeechBubble>,
    mut texts: Query<(&BubbleText, &mut Typewriter)>,
) {
    if selections.read().last().is_some() && !state.success {
        state.success = true;
        info!("NPC bubble switching to the success line");
    }

    let Ok((player_transform, body)) = players.single() else {
        return;
    };
    let player_center = body.center(player_transform);
    let dialogue = &settings.dialogue;

    let near_clearing = player_center.distance(layout.clearing_center) <= dialogue.bubble_proximity;
    let (near_npc, in_personal_space, name) = match npcs.single() {
        Ok((npc_transform, region, identity)) => {
            let npc_center = npc_transform.translation.truncate();
            (
                region.contains_with_margin(npc_center, player_center, dialogue.npc_margin),
                player_center.distance(npc_center) <= dialogue.personal_space,
                identity.display_name.as_str(),
            )
        }
        Err(_) => (false, false, dialogue.npc_name.as_str()),
    };

    state.visible = npc_bubble_visible(state.success, near_clearing, near_npc);
    let desired = npc_line_for(state.success, in_personal_space);

    if state.visible && state.line != Some(desired) {
        let text = match desired {
            NpcLine::Question => &dialogue.question,
            NpcLine::TooClose => &dialogue.too_close,
            NpcLine::Success => &dialogue.success,
        };
        for (bubble_text, mut typewriter) in texts.iter_mut() {
            if bubble_text.speaker == BubbleSpeaker::Npc {
                typewriter.start(text.clone());
            }
        }
        debug!("{} starts saying {:?}", name, desired);
        state.line = Some(desired);
    }

    for mut bubble in bubbles.iter_mut() {
        if bubble.speaker != BubbleSpeaker::Npc {
            continue;
        }
        if state.success {
            bubble.fade.snap(true);
        } else {
            bubble.fade.step(state.visible, clock.delta_secs());
        }
    }
}

/// Shows the closest (or committed) choice label above the player.
#[allow(clippy::too_many_arguments)]
pub fn update_player_bubble(
    clock: Res<FrameClock>,
    settings: Res<VignetteSettings>,
    bounds: Res<WorldBounds>,
    metrics: Res<BubbleMetrics>,
    interaction: Res<InteractionState>,
    mut state: ResMut<PlayerBubbleState>,
    players: Query<(&Transform, &PlayerBody), With<Player>>,
    choices: Query<&Choice>,
    mut bubbles: Query<(&mut SpeechBubble, &mut Transform), Without<Player>>,
    mut texts: Query<(&BubbleText, &mut Typewriter)>,
) {
    let Ok((player_transform, body)) = players.single() else {
        return;
    };

    let shown = player_bubble_choice(&interaction);
    if shown.is_some() && shown != state.shown {
        let label = shown
            .and_then(|index| choices.iter().find(|choice| choice.index == index))
            .map(|choice| choice.label.clone())
            .unwrap_or_default();
        for (bubble_text, mut typewriter) in texts.iter_mut() {
            if bubble_text.speaker == BubbleSpeaker::Player {
                typewriter.start(label.clone());
            }
        }
        state.shown = shown;
    }

    let anchor = player_bubble_anchor(
        &bounds,
        body.center(player_transform),
        settings.dialogue.player_bubble_offset,
        metrics.player_size,
    );
    for (mut bubble, mut transform) in bubbles.iter_mut() {
        if bubble.speaker != BubbleSpeaker::Player {
            continue;
        }
        bubble.fade.step(shown.is_some(), clock.delta_secs());
        transform.translation.x = anchor.x;
        transform.translation.y = anchor.y;
    }
}

/// Choice the player bubble should display, if any.
pub fn player_bubble_choice(interaction: &InteractionState) -> Option<usize> {
    interaction.selected().or_else(|| {
        if interaction.in_range() {
            interaction.closest()
        } else {
            None
        }
    })
}

/// Advances every bubble typewriter and reports completed reveals.
pub fn advance_typewriters(
    clock: Res<FrameClock>,
    mut texts: Query<(&BubbleText, &mut Typewriter, &mut Text2d)>,
    mut finished: MessageWriter<TypewriterFinished>,
) {
    let delta = clock.delta_secs();
    for (bubble_text, mut typewriter, mut text) in texts.iter_mut() {
        let step = typewriter.tick(delta);
        if step == TypewriterStep::Idle {
            continue;
        }
        if text.0 != typewriter.visible_text() {
            text.0 = typewriter.visible_text().to_string();
        }
        if step == TypewriterStep::Finished {
            debug!("{:?} bubble finished: {}", bubble_text.speaker, typewriter.text());
            finished.write(TypewriterFinished {
                speaker: bubble_text.speaker,
                text: typewriter.text().to_string(),
            });
        }
    }
}

/// Applies each bubble's fade as root scale and part alpha.
pub fn animate_bubble_pop_in(
    mut bubbles: Query<(&SpeechBubble, &mut Transform)>,
    mut sprites: Query<(&BubblePart, &mut Sprite)>,
    mut texts: Query<(&BubblePart, &mut TextColor)>,
) {
    let mut npc_alpha = 0.0;
    let mut player_alpha = 0.0;
    for (bubble, mut transform) in bubbles.iter_mut() {
        transform.scale = Vec3::splat(pop_in_scale(bubble.fade.eased()));
        match bubble.speaker {
            BubbleSpeaker::Npc => npc_alpha = bubble.fade.value(),
            BubbleSpeaker::Player => player_alpha = bubble.fade.value(),
        }
    }
    let alpha_for = |speaker: BubbleSpeaker| match speaker {
        BubbleSpeaker::Npc => npc_alpha,
        BubbleSpeaker::Player => player_alpha,
    };

    for (part, mut sprite) in sprites.iter_mut() {
        sprite.color = part.base_color.with_alpha(alpha_for(part.speaker));
    }
    for (part, mut color) in texts.iter_mut() {
        color.0 = part.base_color.with_alpha(alpha_for(part.speaker));
    }
}

/// Rose labels fade with the NPC bubble's proximity.
pub fn fade_choice_labels(
    clock: Res<FrameClock>,
    state: Res<NpcBubbleState>,
    mut labels: Query<(&mut ChoiceLabel, &mut TextColor), Without<BubblePart>>,
) {
    for (mut label, mut color) in labels.iter_mut() {
        let alpha = label.fade.step(state.visible, clock.delta_secs());
        color.0 = color.0.with_alpha(alpha);
    }
}
