// src/ui/speech_bubble/components.rs
//
// Speech bubble components, bubble state and the placement math behind them.

use bevy::prelude::*;

use crate::{core::fade::Fade, world::components::WorldBounds};

/// Gap between the NPC's head and the bubble tail.
const NPC_BUBBLE_LIFT: f32 = 4.0;
const BUBBLE_TAIL_HEIGHT: f32 = 10.0;

/// Smallest scale of a bubble while popping in.
const POP_IN_MIN_SCALE: f32 = 0.6;

/// Which side of the conversation a bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BubbleSpeaker {
    Npc,
    Player,
}

/// Root of a speech bubble. Children carry [`BubblePart`].
#[derive(Component, Debug)]
pub struct SpeechBubble {
    pub speaker: BubbleSpeaker,
    pub fade: Fade,
}

/// A drawable piece of a bubble whose alpha follows the bubble's fade.
#[derive(Component, Debug, Clone, Copy)]
pub struct BubblePart {
    pub speaker: BubbleSpeaker,
    pub base_color: Color,
}

/// The message line inside a bubble, revealed by a `Typewriter`.
#[derive(Component, Debug)]
pub struct BubbleText {
    pub speaker: BubbleSpeaker,
}

/// The three lines the NPC can say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpcLine {
    Question,
    TooClose,
    Success,
}

/// What the NPC bubble currently shows.
#[derive(Resource, Debug, Default)]
pub struct NpcBubbleState {
    pub line: Option<NpcLine>,
    pub success: bool,
    pub visible: bool,
}

/// Which choice label the player bubble currently shows.
#[derive(Resource, Debug, Default)]
pub struct PlayerBubbleState {
    pub shown: Option<usize>,
}

/// Sizes shared by the bubble spawners and their placement.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct BubbleMetrics {
    pub font_size: f32,
    pub name_font_size: f32,
    pub npc_size: Vec2,
    pub player_size: Vec2,
}

impl BubbleMetrics {
    /// Responsive sizing from the world width, bounded for phones and desktops.
    pub fn for_world_width(width: f32) -> Self {
        let font_size = (width * 0.024).clamp(10.0, 16.0).round();
        let name_font_size = (width * 0.018).clamp(9.0, 13.0).round();
        let npc_width = (width * 0.22).clamp(110.0, 140.0);
        let body_height = font_size * 2.2 + 4.0;
        Self {
            font_size,
            name_font_size,
            npc_size: Vec2::new(npc_width, body_height),
            player_size: Vec2::new(npc_width * 1.15, font_size * 1.8 + 4.0),
        }
    }
}

/// Line the NPC should be saying. Success wins, then personal space.
pub fn npc_line_for(success: bool, in_personal_space: bool) -> NpcLine {
    if success {
        NpcLine::Success
    } else if in_personal_space {
        NpcLine::TooClose
    } else {
        NpcLine::Question
    }
}

/// NPC bubble visibility: always after success, otherwise near the clearing or the NPC.
pub fn npc_bubble_visible(success: bool, near_clearing: bool, near_npc: bool) -> bool {
    success || near_clearing || near_npc
}

/// Centre of the NPC bubble: above the NPC, kept inside the world.
pub fn npc_bubble_anchor(
    bounds: &WorldBounds,
    npc_center: Vec2,
    npc_half_height: f32,
    size: Vec2,
) -> Vec2 {
    let ideal = Vec2::new(
        npc_center.x,
        npc_center.y + npc_half_height + NPC_BUBBLE_LIFT + BUBBLE_TAIL_HEIGHT + size.y * 0.5,
    );
    bounds.clamp_inside(ideal, size * 0.5)
}

/// Centre of the player bubble: a fixed offset from the player, kept inside the world.
pub fn player_bubble_anchor(
    bounds: &WorldBounds,
    player_center: Vec2,
    offset: Vec2,
    size: Vec2,
) -> Vec2 {
    bounds.clamp_inside(player_center + offset, size * 0.5)
}

/// Root scale for a pop-in value in `[0, 1]`.
pub fn pop_in_scale(value: f32) -> f32 {
    POP_IN_MIN_SCALE + (1.0 - POP_IN_MIN_SCALE) * value.clamp(0.0, 1.0)
}

pub fn tail_height() -> f32 {
    BUBBLE_TAIL_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_overrides_every_other_line() {
        assert_eq!(npc_line_for(true, true), NpcLine::Success);
        assert_eq!(npc_line_for(true, false), NpcLine::Success);
        assert_eq!(npc_line_for(false, true), NpcLine::TooClose);
        assert_eq!(npc_line_for(false, false), NpcLine::Question);
    }

    #[test]
    fn bubble_stays_visible_after_success() {
        assert!(npc_bubble_visible(true, false, false));
        assert!(npc_bubble_visible(false, true, false));
        assert!(npc_bubble_visible(false, false, true));
        assert!(!npc_bubble_visible(false, false, false));
    }

    #[test]
    fn player_bubble_is_clamped_inside_world() {
        let bounds = WorldBounds::centered(Vec2::new(400.0, 300.0));
        let size = Vec2::new(100.0, 30.0);

        let free = player_bubble_anchor(&bounds, Vec2::ZERO, Vec2::new(0.0, 52.0), size);
        assert_eq!(free, Vec2::new(0.0, 52.0));

        let corner = player_bubble_anchor(&bounds, Vec2::new(195.0, 140.0), Vec2::new(0.0, 52.0), size);
        assert_eq!(corner, Vec2::new(150.0, 135.0));
    }

    #[test]
    fn npc_bubble_sits_above_npc() {
        let bounds = WorldBounds::centered(Vec2::new(1280.0, 720.0));
        let size = Vec2::new(140.0, 39.2);
        let anchor = npc_bubble_anchor(&bounds, Vec2::new(400.0, 0.0), 16.0, size);
        assert_eq!(anchor.x, 400.0);
        assert!(anchor.y - size.y * 0.5 > 16.0);
    }

    #[test]
    fn pop_in_scale_spans_sixty_to_hundred_percent() {
        assert!((pop_in_scale(0.0) - 0.6).abs() < 1e-6);
        assert!((pop_in_scale(0.5) - 0.8).abs() < 1e-6);
        assert!((pop_in_scale(2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn metrics_are_bounded() {
        let phone = BubbleMetrics::for_world_width(360.0);
        assert_eq!(phone.font_size, 10.0);
        assert_eq!(phone.npc_size.x, 110.0);

        let desktop = BubbleMetrics::for_world_width(1920.0);
        assert_eq!(desktop.font_size, 16.0);
        assert_eq!(desktop.name_font_size, 13.0);
        assert_eq!(desktop.npc_size.x, 140.0);
    }
}
