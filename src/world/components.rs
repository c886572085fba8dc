//! Components and resources describing the static scene.
use std::path::Path;

use bevy::prelude::*;

use crate::core::settings::VignetteSettings;

/// Radius of the rose placeholders drawn at each choice.
pub const ROSE_RADIUS: f32 = 26.0;

/// Player sprite sheet layout: three walk frames per row, one row per facing.
pub const PLAYER_SHEET_COLUMNS: u32 = 3;
pub const PLAYER_SHEET_ROWS: u32 = 4;
pub const PLAYER_SHEET_FRAME: UVec2 = UVec2::new(32, 32);

const ASSET_ROOT: &str = "assets";
const PLAYER_SHEET_PATH: &str = "characters/player_sheet.png";
const FIELD_TILE_PATH: &str = "tiles/rose_field_tile.png";
const FONT_PATH: &str = "fonts/Nunito.ttf";

/// Axis-aligned playable area in world coordinates (y up).
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    /// Bounds of the given size centred on the origin, matching a default 2D camera.
    pub fn centered(size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: -half,
            max: half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Clamps a point so a box of `half_extent` around it stays inside the bounds.
    pub fn clamp_inside(&self, point: Vec2, half_extent: Vec2) -> Vec2 {
        let lo = self.min + half_extent;
        let hi = self.max - half_extent;
        Vec2::new(
            clamp_axis(point.x, lo.x, hi.x),
            clamp_axis(point.y, lo.y, hi.y),
        )
    }
}

// Boxes wider than the world are centred instead of panicking in `f32::clamp`.
fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        value.clamp(lo, hi)
    }
}

/// Landmark positions derived once from the world bounds and settings.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub clearing_center: Vec2,
    pub clearing_radius: f32,
    pub path: Rect,
    pub choice_positions: Vec<Vec2>,
    pub npc_center: Vec2,
    pub player_spawn: Vec2,
}

impl SceneLayout {
    pub fn compute(bounds: &WorldBounds, settings: &VignetteSettings) -> Self {
        let world = &settings.world;
        let radius = world.clearing_radius;
        let clearing_center = Vec2::new(
            bounds.min.x + bounds.width() * (1.0 - world.clearing_padding_fraction) - radius,
            bounds.center().y,
        );

        let path_right =
            (clearing_center.x - radius + radius * world.path_overlap_fraction).max(bounds.min.x);
        let half_path = world.path_height * 0.5;
        let path = Rect::new(
            bounds.min.x,
            clearing_center.y - half_path,
            path_right,
            clearing_center.y + half_path,
        );

        let choice_positions: Vec<Vec2> = settings
            .choices
            .iter()
            .map(|choice| clearing_center + choice.offset)
            .collect();

        let rose_column = settings
            .choices
            .iter()
            .map(|choice| choice.offset.x)
            .fold(None, |acc: Option<f32>, x| Some(acc.map_or(x, |a| a.max(x))))
            .unwrap_or(0.0);
        let npc_center = Vec2::new(
            clearing_center.x
                + rose_column
                + ROSE_RADIUS * 2.0
                + settings.npc.gap
                + settings.npc.size * 0.5,
            clearing_center.y,
        );

        let player_spawn = Vec2::new(bounds.min.x + settings.player.spawn_inset, bounds.center().y);

        Self {
            clearing_center,
            clearing_radius: radius,
            path,
            choice_positions,
            npc_center,
            player_spawn,
        }
    }
}

/// Primitive stand-in used when a sprite is not available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceholderShape {
    Rect { size: Vec2, color: Color },
}

/// Sprite sheet backing an animated entity.
#[derive(Debug, Clone)]
pub struct SpriteSheetRef {
    pub image: Handle<Image>,
    pub layout: Handle<TextureAtlasLayout>,
    pub columns: usize,
}

/// Render descriptor resolved once at setup and never re-checked per frame.
#[derive(Debug, Clone)]
pub enum Appearance {
    Placeholder(PlaceholderShape),
    Animated(SpriteSheetRef),
}

impl Appearance {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Optional assets discovered on disk at startup.
#[derive(Resource, Debug, Clone)]
pub struct SceneAssets {
    pub player: Appearance,
    pub field_tile: Option<Handle<Image>>,
    pub font: Option<Handle<Font>>,
}

impl SceneAssets {
    /// Text styling that uses the custom font when it shipped with the build.
    pub fn text_font(&self, font_size: f32) -> TextFont {
        match &self.font {
            Some(font) => TextFont {
                font: font.clone(),
                font_size,
                ..default()
            },
            None => TextFont {
                font_size,
                ..default()
            },
        }
    }
}

/// Whether an optional asset ships under the asset root.
pub fn asset_available(relative: &str) -> bool {
    Path::new(ASSET_ROOT).join(relative).is_file()
}

pub fn player_sheet_path() -> &'static str {
    PLAYER_SHEET_PATH
}

pub fn field_tile_path() -> &'static str {
    FIELD_TILE_PATH
}

pub fn font_path() -> &'static str {
    FONT_PATH
}

/// Marker for the clearing disc.
#[derive(Component, Debug)]
pub struct Clearing;

/// Marker for static background scenery.
#[derive(Component, Debug)]
pub struct Scenery;
