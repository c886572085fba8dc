//! Input mode resolved once at startup and threaded through run conditions.
use bevy::{input::touch::Touches, prelude::*, window::PrimaryWindow};

use super::settings::InputModePreference;

/// How the player commits choices and moves around.
///
/// Desktop uses the interact key for commits and mouse clicks for movement only.
/// Touch additionally accepts taps on a choice as a commit.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Desktop,
    Touch,
}

impl InputMode {
    pub fn resolve(preference: InputModePreference, touch_capable: bool) -> Self {
        match preference {
            InputModePreference::Desktop => Self::Desktop,
            InputModePreference::Touch => Self::Touch,
            InputModePreference::Auto if touch_capable => Self::Touch,
            InputModePreference::Auto => Self::Desktop,
        }
    }

    pub fn is_touch(self) -> bool {
        matches!(self, Self::Touch)
    }

    /// Text shown by the choice prompt.
    pub fn prompt_label(self) -> &'static str {
        match self {
            Self::Desktop => "(E) Interact",
            Self::Touch => "Tap",
        }
    }
}

/// Capability probe for the build target.
pub fn touch_capable() -> bool {
    cfg!(any(target_os = "android", target_os = "ios"))
}

/// Run condition for systems that only exist on touch contexts.
pub fn touch_input_enabled(mode: Res<InputMode>) -> bool {
    mode.is_touch()
}

/// World positions of this frame's touches and left clicks.
///
/// A tap commit claims the frame's presses so tap-to-move leaves them alone.
#[derive(Resource, Debug, Default)]
pub struct PointerPresses {
    positions: Vec<Vec2>,
    claimed: bool,
}

impl PointerPresses {
    /// Replaces the presses and clears any claim from the previous frame.
    pub fn set(&mut self, positions: Vec<Vec2>) {
        self.positions = positions;
        self.claimed = false;
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn latest(&self) -> Option<Vec2> {
        self.positions.last().copied()
    }

    pub fn claim(&mut self) {
        self.claimed = true;
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }
}

/// Converts this frame's pointer presses to world space through the scene camera.
pub fn collect_pointer_presses(
    mut presses: ResMut<PointerPresses>,
    touches: Res<Touches>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) {
    let screens = just_pressed_pointers(&touches, &mouse, windows.single().ok());
    let world = match cameras.single() {
        Ok((camera, camera_transform)) => screens
            .into_iter()
            .filter_map(|screen| screen_to_world(camera, camera_transform, screen))
            .collect(),
        Err(_) => Vec::new(),
    };
    presses.set(world);
}

/// Screen positions of every touch or left click that started this frame.
pub fn just_pressed_pointers(
    touches: &Touches,
    mouse: &ButtonInput<MouseButton>,
    window: Option<&Window>,
) -> Vec<Vec2> {
    let mut pointers: Vec<Vec2> = touches
        .iter_just_pressed()
        .map(|touch| touch.position())
        .collect();
    if mouse.just_pressed(MouseButton::Left) {
        if let Some(cursor) = window.and_then(|window| window.cursor_position()) {
            pointers.push(cursor);
        }
    }
    pointers
}

/// Converts a window position into 2D world coordinates through the scene camera.
pub fn screen_to_world(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    screen: Vec2,
) -> Option<Vec2> {
    camera.viewport_to_world_2d(camera_transform, screen).ok()
}
