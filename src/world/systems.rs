//! Systems that build the static scene: bounds, layout, camera and scenery.
use bevy::{prelude::*, window::PrimaryWindow};

use crate::{
    core::{fade::Fade, settings::VignetteSettings},
    interaction::components::{Choice, ChoiceLabel},
    world::components::{
        asset_available, field_tile_path, font_path, player_sheet_path, Appearance, Clearing,
        PlaceholderShape, SceneAssets, SceneLayout, Scenery, SpriteSheetRef, WorldBounds,
        PLAYER_SHEET_COLUMNS, PLAYER_SHEET_FRAME, PLAYER_SHEET_ROWS, ROSE_RADIUS,
    },
};

const TILE_SIZE: f32 = 120.0;
const FIELD_COLOR: Color = Color::srgb_u8(80, 120, 60);
const FIELD_DOT_COLOR: Color = Color::srgb_u8(100, 140, 80);
const PATH_COLOR: Color = Color::srgb_u8(180, 155, 110);
const CLEARING_COLOR: Color = Color::srgb_u8(160, 190, 130);
const ROSE_COLOR: Color = Color::srgb_u8(200, 50, 50);
const PLAYER_PLACEHOLDER_COLOR: Color = Color::srgb_u8(200, 80, 80);
const LABEL_FONT_SIZE: f32 = 13.0;

/// Derives world bounds from the primary window (config size when headless) and the layout.
pub fn init_scene_layout(
    mut commands: Commands,
    settings: Res<VignetteSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let size = windows
        .single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or(settings.world.fallback_size);

    let bounds = WorldBounds::centered(size);
    let layout = SceneLayout::compute(&bounds, &settings);

    info!(
        "World bounds {:.0}x{:.0}, clearing at ({:.0}, {:.0}), {} choice(s)",
        bounds.width(),
        bounds.height(),
        layout.clearing_center.x,
        layout.clearing_center.y,
        layout.choice_positions.len()
    );

    commands.insert_resource(bounds);
    commands.insert_resource(layout);
}

/// Resolves optional sprites and fonts once; missing files fall back to placeholders.
pub fn resolve_scene_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut atlas_layouts: ResMut<Assets<TextureAtlasLayout>>,
    settings: Res<VignetteSettings>,
) {
    let player = if asset_available(player_sheet_path()) {
        let layout = TextureAtlasLayout::from_grid(
            PLAYER_SHEET_FRAME,
            PLAYER_SHEET_COLUMNS,
            PLAYER_SHEET_ROWS,
            None,
            None,
        );
        Appearance::Animated(SpriteSheetRef {
            image: asset_server.load(player_sheet_path()),
            layout: atlas_layouts.add(layout),
            columns: PLAYER_SHEET_COLUMNS as usize,
        })
    } else {
        let size = settings.player.size;
        Appearance::Placeholder(PlaceholderShape::Rect {
            size: Vec2::splat(size),
            color: PLAYER_PLACEHOLDER_COLOR,
        })
    };

    let field_tile: Option<Handle<Image>> =
        asset_available(field_tile_path()).then(|| asset_server.load(field_tile_path()));
    let font: Option<Handle<Font>> =
        asset_available(font_path()).then(|| asset_server.load(font_path()));

    info!(
        "Scene assets: player {}, field tile {}, font {}",
        if player.is_placeholder() { "placeholder" } else { "sprite sheet" },
        if field_tile.is_some() { "loaded" } else { "placeholder" },
        if font.is_some() { "custom" } else { "default" },
    );

    commands.insert_resource(SceneAssets {
        player,
        field_tile,
        font,
    });
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Name::new("Scene Camera")));
}

/// Spawns the field, path, clearing and the rose choices with their labels.
pub fn spawn_scenery(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    bounds: Res<WorldBounds>,
    layout: Res<SceneLayout>,
    assets: Res<SceneAssets>,
    settings: Res<VignetteSettings>,
) {
    spawn_field(&mut commands, &mut meshes, &mut materials, &bounds, &assets);

    commands.spawn((
        Sprite::from_color(PATH_COLOR, layout.path.size()),
        Transform::from_translation(layout.path.center().extend(0.5)),
        Scenery,
        Name::new("Path"),
    ));

    commands.spawn((
        Mesh2d(meshes.add(Circle::new(layout.clearing_radius))),
        MeshMaterial2d(materials.add(ColorMaterial::from(CLEARING_COLOR))),
        Transform::from_translation(layout.clearing_center.extend(0.6)),
        Clearing,
        Name::new("Clearing"),
    ));

    let rose_mesh = meshes.add(Circle::new(ROSE_RADIUS));
    let rose_material = materials.add(ColorMaterial::from(ROSE_COLOR));
    let label_fade = settings.dialogue.pop_in_seconds;

    for (index, (choice, position)) in settings
        .choices
        .iter()
        .zip(layout.choice_positions.iter())
        .enumerate()
    {
        commands.spawn((
            Mesh2d(rose_mesh.clone()),
            MeshMaterial2d(rose_material.clone()),
            Transform::from_translation(position.extend(2.0)),
            Choice::new(index, choice.label.clone()),
            Name::new(format!("Choice {} ({})", index, choice.label)),
        ));

        commands.spawn((
            Text2d::new(choice.label.clone()),
            assets.text_font(LABEL_FONT_SIZE),
            TextColor(Color::WHITE.with_alpha(0.0)),
            Transform::from_translation(position.extend(3.0)),
            ChoiceLabel {
                index,
                fade: Fade::hidden(label_fade),
            },
        ));
    }
}

fn spawn_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    bounds: &WorldBounds,
    assets: &SceneAssets,
) {
    let columns = (bounds.width() / TILE_SIZE).ceil() as i32 + 1;
    let rows = (bounds.height() / TILE_SIZE).ceil() as i32 + 1;
    let tile_origin = |column: i32, row: i32| {
        Vec2::new(
            bounds.min.x + (column as f32 + 0.5) * TILE_SIZE,
            bounds.min.y + (row as f32 + 0.5) * TILE_SIZE,
        )
    };

    if let Some(tile) = &assets.field_tile {
        for column in 0..columns {
            for row in 0..rows {
                let mut sprite = Sprite::from_image(tile.clone());
                sprite.custom_size = Some(Vec2::splat(TILE_SIZE));
                commands.spawn((
                    sprite,
                    Transform::from_translation(tile_origin(column, row).extend(0.0)),
                    Scenery,
                ));
            }
        }
        return;
    }

    commands.spawn((
        Sprite::from_color(FIELD_COLOR, Vec2::new(bounds.width(), bounds.height())),
        Transform::from_translation(bounds.center().extend(0.0)),
        Scenery,
        Name::new("Field"),
    ));

    let dot_mesh = meshes.add(Circle::new(4.0));
    let dot_material = materials.add(ColorMaterial::from(FIELD_DOT_COLOR));
    for column in 0..columns {
        for row in 0..rows {
            commands.spawn((
                Mesh2d(dot_mesh.clone()),
                MeshMaterial2d(dot_material.clone()),
                Transform::from_translation(tile_origin(column, row).extend(0.1)),
                Scenery,
            ));
        }
    }
}
