//! CorePlugin wires settings, frame timing, input mode and system ordering.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

use super::{
    input::{collect_pointer_presses, touch_capable, InputMode, PointerPresses},
    settings::{radius_enabled, VignetteSettings},
};

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;

/// Per-frame ordering shared by every plugin.
///
/// Pointer presses are resolved to world space in Clock. Tap commits run at the
/// start of Movement, before the player steps. Interaction writes its messages
/// before Presentation reads them, so a commit reaches the bubbles and the
/// petal burst within the same frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Clock,
    Movement,
    Interaction,
    Presentation,
}

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Scaled frame time fed to every per-frame system.
///
/// Per-frame systems read `delta_secs` from here instead of `Time`.
#[derive(Resource, Debug)]
pub struct FrameClock {
    scale: f32,
    frame: Duration,
    since_startup: Duration,
}

impl FrameClock {
    pub fn new(scale: f32) -> Self {
        Self {
            scale: scale.max(MIN_TIME_SCALE),
            frame: Duration::ZERO,
            since_startup: Duration::ZERO,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.scale
    }

    /// Scaled delta of the current frame, in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.frame.as_secs_f32()
    }

    /// Total scaled time since startup, in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.since_startup.as_secs_f64()
    }

    /// Scales one real frame and adds it to the running total.
    pub fn tick(&mut self, real_delta: Duration) {
        self.frame = real_delta.mul_f32(self.scale);
        self.since_startup += self.frame;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let settings = VignetteSettings::load_or_default();
        let input_mode = InputMode::resolve(settings.input_mode, touch_capable());

        app.insert_resource(settings)
            .insert_resource(input_mode)
            .insert_resource(FrameClock::new(self.time_scale))
            .init_resource::<PointerPresses>()
            .configure_sets(
                Update,
                (
                    FrameSet::Clock,
                    FrameSet::Movement,
                    FrameSet::Interaction,
                    FrameSet::Presentation,
                )
                    .chain(),
            )
            .add_systems(Startup, log_startup_configuration)
            .add_systems(
                Update,
                (advance_frame_clock, collect_pointer_presses).in_set(FrameSet::Clock),
            );

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(Update, log_frame_ticks.after(FrameSet::Clock));
        }
    }
}

fn advance_frame_clock(mut clock: ResMut<FrameClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_startup_configuration(
    clock: Res<FrameClock>,
    settings: Res<VignetteSettings>,
    mode: Res<InputMode>,
) {
    info!(
        "CorePlugin initialised: time scale {:.3}, input mode {:?}, {} choice(s)",
        clock.time_scale(),
        *mode,
        settings.choices.len()
    );

    if !settings.choices_enabled() {
        warn!(
            "Choice interaction inactive (proximity radius {}, {} choice(s))",
            settings.interaction.proximity_radius,
            settings.choices.len()
        );
    }
    if mode.is_touch() && !radius_enabled(settings.interaction.tap_radius) {
        warn!(
            "Tap-to-commit inactive (tap radius {})",
            settings.interaction.tap_radius
        );
    }
}

#[cfg(feature = "core_debug")]
fn log_frame_ticks(
    mut timer: ResMut<DebugTickTimer>,
    clock: Res<FrameClock>,
    time: Res<Time>,
) {
    if timer
        .timer
        .tick(Duration::from_secs_f32(clock.delta_secs()))
        .just_finished()
    {
        info!(
            target: "core_debug",
            "Elapsed: {:.2}s | scale: {:.3} | real dt: {:.4}s | scaled dt: {:.4}s",
            clock.elapsed_secs(),
            clock.time_scale(),
            time.delta_secs(),
            clock.delta_secs(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_scales_delta_with_multiplier() {
        let mut clock = FrameClock::new(2.5);
        clock.tick(Duration::from_secs_f32(1.2));

        assert_eq!(clock.time_scale(), 2.5);
        assert!((clock.delta_secs() - 3.0).abs() < 1e-5);
        assert!((clock.elapsed_secs() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn clock_clamps_min_time_scale() {
        let clock = FrameClock::new(0.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);

        let clock = FrameClock::new(-5.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);
    }
}
