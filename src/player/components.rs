//! Components for the player character.
use bevy::prelude::*;

/// Marker component identifying the player entity.
#[derive(Component, Debug)]
pub struct Player;

/// Logical body used for interaction distances, decoupled from sprite bounds.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerBody {
    pub offset: Vec2,
    pub half_extent: Vec2,
}

impl PlayerBody {
    pub fn center(&self, transform: &Transform) -> Vec2 {
        transform.translation.truncate() + self.offset
    }
}

/// Direction the player last moved in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Dominant axis of a movement vector; `None` when standing still.
    pub fn from_direction(direction: Vec2) -> Option<Self> {
        if direction.length_squared() <= f32::EPSILON {
            return None;
        }
        if direction.x.abs() >= direction.y.abs() {
            Some(if direction.x >= 0.0 { Self::Right } else { Self::Left })
        } else {
            Some(if direction.y >= 0.0 { Self::Up } else { Self::Down })
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }

    /// Row in the player sprite sheet.
    pub fn sheet_row(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Up => 3,
        }
    }
}

/// Walk state plus the sprite-sheet frame cursor.
#[derive(Component, Debug)]
pub struct PlayerMotion {
    pub moving: bool,
    pub frame: usize,
    pub frame_timer: Timer,
}

impl Default for PlayerMotion {
    fn default() -> Self {
        Self {
            moving: false,
            frame: 0,
            frame_timer: Timer::from_seconds(0.15, TimerMode::Repeating),
        }
    }
}

/// Destination set by click-to-move (desktop) or tap-to-move (touch).
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct MoveTarget(pub Option<Vec2>);
