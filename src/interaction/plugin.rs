//! InteractionPlugin wires the one-shot choice controller and its telemetry.
use bevy::prelude::*;

use crate::{
    core::{input::touch_input_enabled, plugin::FrameSet, settings::VignetteSettings},
    player::systems::set_move_target_from_pointer,
    interaction::{
        events::{ChoiceRangeChanged, ChoiceSelected},
        state::InteractionState,
        systems::{
            commit_on_interact_key, commit_on_tap, spawn_choice_prompt, track_choice_proximity,
            update_choice_prompt,
        },
        telemetry::{
            flush_session_telemetry, record_interaction_telemetry, SessionTelemetry,
            SessionTelemetryLog,
        },
    },
    world::plugin::SceneSetup,
};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        let telemetry = app
            .world()
            .get_resource::<VignetteSettings>()
            .map(|settings| settings.telemetry.clone())
            .unwrap_or_else(|| VignetteSettings::default().telemetry);

        app.init_resource::<InteractionState>()
            .insert_resource(SessionTelemetry::new(telemetry.capacity))
            .insert_resource(SessionTelemetryLog::new(&telemetry.log_path))
            .add_message::<ChoiceSelected>()
            .add_message::<ChoiceRangeChanged>()
            .add_systems(Startup, spawn_choice_prompt.after(SceneSetup))
            .add_systems(
                Update,
                commit_on_tap
                    .run_if(touch_input_enabled)
                    .in_set(FrameSet::Movement)
                    .before(set_move_target_from_pointer),
            )
            .add_systems(
                Update,
                (track_choice_proximity, commit_on_interact_key)
                    .chain()
                    .in_set(FrameSet::Interaction),
            )
            .add_systems(
                Update,
                (
                    update_choice_prompt,
                    (record_interaction_telemetry, flush_session_telemetry).chain(),
                )
                    .in_set(FrameSet::Presentation),
            );

        info!(
            "InteractionPlugin initialised; session telemetry at {}",
            telemetry.log_path
        );
    }
}
