//! Systems driving the choice controller: proximity, commit inputs and the prompt.
use bevy::prelude::*;

use crate::{
    core::{
        input::{InputMode, PointerPresses},
        plugin::FrameClock,
        settings::VignetteSettings,
    },
    interaction::{
        components::{Choice, ChoicePrompt},
        events::{ChoiceRangeChanged, ChoiceSelected},
        proximity::min_distance,
        state::{observe_positions, ChoicePhase, InteractionState},
    },
    player::components::{Player, PlayerBody},
    world::components::SceneAssets,
};

/// Key that commits the closest in-range choice.
pub const INTERACT_KEY: KeyCode = KeyCode::KeyE;

const PROMPT_FONT_SIZE: f32 = 16.0;

/// Choice positions ordered by registration index.
pub fn ordered_choice_positions<'a>(
    choices: impl Iterator<Item = (&'a Choice, &'a Transform)>,
) -> Vec<Vec2> {
    let mut indexed: Vec<(usize, Vec2)> = choices
        .map(|(choice, transform)| (choice.index, transform.translation.truncate()))
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, position)| position).collect()
}

pub fn spawn_choice_prompt(
    mut commands: Commands,
    assets: Res<SceneAssets>,
    mode: Res<InputMode>,
    settings: Res<VignetteSettings>,
) {
    commands.spawn((
        Text2d::new(mode.prompt_label()),
        assets.text_font(PROMPT_FONT_SIZE),
        TextColor(Color::WHITE.with_alpha(0.0)),
        Transform::from_xyz(0.0, 0.0, 7.0),
        ChoicePrompt {
            fade: crate::core::fade::Fade::hidden(settings.interaction.prompt_fade_seconds),
        },
        Name::new("Choice Prompt"),
    ));
}

/// Recomputes the closest in-range choice and reports range edges.
pub fn track_choice_proximity(
    settings: Res<VignetteSettings>,
    mut state: ResMut<InteractionState>,
    players: Query<(&Transform, &PlayerBody), With<Player>>,
    choices: Query<(&Choice, &Transform), Without<Player>>,
    mut range_events: MessageWriter<ChoiceRangeChanged>,
) {
    if state.success_fired() {
        return;
    }
    let Ok((transform, body)) = players.single() else {
        return;
    };

    let center = body.center(transform);
    let positions = ordered_choice_positions(choices.iter());
    let Some(event) = observe_positions(
        &mut state,
        center,
        &positions,
        settings.interaction.proximity_radius,
    ) else {
        return;
    };

    let distance = min_distance(center, &positions).unwrap_or(f32::INFINITY);
    match event {
        ChoiceRangeChanged::Entered { index } => {
            debug!("Choice {} entered range ({:.0} away)", index, distance)
        }
        ChoiceRangeChanged::Left => debug!("Choices left range ({:.0} away)", distance),
    }
    range_events.write(event);
}

/// Commits the closest in-range choice when the interact key is pressed.
pub fn commit_on_interact_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<InteractionState>,
    choices: Query<&Choice>,
    mut selected: MessageWriter<ChoiceSelected>,
) {
    if !keyboard.just_pressed(INTERACT_KEY) || state.success_fired() {
        return;
    }

    let Some(index) = state.commit_closest() else {
        debug!("Interact pressed with no choice in range");
        return;
    };
    announce_selection(index, choices.iter(), &mut selected);
}

/// Commits a tapped choice on touch contexts, provided the player is in range of it.
///
/// Runs before the player moves, so the range check and tap-to-move agree on
/// the same body centre. A committing tap claims the frame's presses.
pub fn commit_on_tap(
    settings: Res<VignetteSettings>,
    mut state: ResMut<InteractionState>,
    mut presses: ResMut<PointerPresses>,
    players: Query<(&Transform, &PlayerBody), With<Player>>,
    choices: Query<(&Choice, &Transform), Without<Player>>,
    mut selected: MessageWriter<ChoiceSelected>,
) {
    if state.success_fired() || presses.positions().is_empty() {
        return;
    }
    let Ok((transform, body)) = players.single() else {
        return;
    };

    let center = body.center(transform);
    let positions = ordered_choice_positions(choices.iter());
    let committed = presses.positions().iter().find_map(|tap| {
        state.commit_tap(
            *tap,
            center,
            &positions,
            settings.interaction.proximity_radius,
            settings.interaction.tap_radius,
        )
    });

    if let Some(index) = committed {
        presses.claim();
        announce_selection(index, choices.iter().map(|(choice, _)| choice), &mut selected);
    }
}

fn announce_selection<'a>(
    index: usize,
    mut choices: impl Iterator<Item = &'a Choice>,
    selected: &mut MessageWriter<ChoiceSelected>,
) {
    let label = choices
        .find(|choice| choice.index == index)
        .map(|choice| choice.label.clone())
        .unwrap_or_else(|| format!("choice {}", index));

    info!(
        "Choice selected: {} (index {}); success fired, interactions locked",
        label, index
    );
    selected.write(ChoiceSelected { index, label });
}

/// Keeps the prompt under the player and eases its opacity with the range state.
pub fn update_choice_prompt(
    clock: Res<FrameClock>,
    settings: Res<VignetteSettings>,
    state: Res<InteractionState>,
    players: Query<(&Transform, &PlayerBody), With<Player>>,
    mut prompts: Query<(&mut ChoicePrompt, &mut Transform, &mut TextColor), Without<Player>>,
) {
    let center = players
        .single()
        .ok()
        .map(|(transform, body)| body.center(transform));

    for (mut prompt, mut transform, mut color) in prompts.iter_mut() {
        let alpha = match state.phase() {
            ChoicePhase::Committed => {
                prompt.fade.snap(false);
                0.0
            }
            ChoicePhase::InRange => prompt.fade.step(true, clock.delta_secs()),
            ChoicePhase::OutOfRange => prompt.fade.step(false, clock.delta_secs()),
        };
        color.0 = color.0.with_alpha(alpha);

        if let Some(center) = center {
            let position = center - Vec2::Y * settings.interaction.prompt_offset;
            transform.translation.x = position.x;
            transform.translation.y = position.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::input::touch_input_enabled,
        player::{
            components::{Facing, MoveTarget, PlayerMotion},
            systems::{move_player, set_move_target_from_pointer},
        },
        world::components::WorldBounds,
    };

    #[derive(Resource, Default)]
    struct Received {
        selections: Vec<ChoiceSelected>,
        ranges: Vec<ChoiceRangeChanged>,
    }

    fn count_notifications(
        mut received: ResMut<Received>,
        mut selections: MessageReader<ChoiceSelected>,
        mut ranges: MessageReader<ChoiceRangeChanged>,
    ) {
        received.selections.extend(selections.read().cloned());
        received.ranges.extend(ranges.read().copied());
    }

    fn headless_app(player: Vec2) -> App {
        let mut app = App::new();
        app.insert_resource(VignetteSettings::default())
            .init_resource::<InteractionState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Received>()
            .add_message::<ChoiceSelected>()
            .add_message::<ChoiceRangeChanged>()
            .add_systems(
                Update,
                (
                    track_choice_proximity,
                    commit_on_interact_key,
                    count_notifications,
                )
                    .chain(),
            );

        app.world_mut().spawn((
            Transform::from_translation(player.extend(0.0)),
            Player,
            PlayerBody {
                offset: Vec2::ZERO,
                half_extent: Vec2::splat(16.0),
            },
        ));
        app.world_mut().spawn((
            Transform::from_xyz(40.0, 0.0, 0.0),
            Choice::new(0, "Yes"),
        ));
        app.world_mut().spawn((
            Transform::from_xyz(120.0, 0.0, 0.0),
            Choice::new(1, "You already said yes"),
        ));
        app
    }

    #[test]
    fn interact_key_fans_out_a_single_notification_in_the_same_frame() {
        let mut app = headless_app(Vec2::ZERO);

        app.update();
        assert_eq!(
            app.world().resource::<Received>().ranges,
            vec![ChoiceRangeChanged::Entered { index: 0 }]
        );
        assert!(app.world().resource::<Received>().selections.is_empty());

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(INTERACT_KEY);
        app.update();

        let received = app.world().resource::<Received>();
        assert_eq!(received.selections.len(), 1);
        assert_eq!(received.selections[0].index, 0);
        assert_eq!(received.selections[0].label, "Yes");
        assert_eq!(app.world().resource::<InteractionState>().selected(), Some(0));

        // The key stays "just pressed" without an input plugin clearing it,
        // so every further frame re-enters the commit path.
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.world().resource::<Received>().selections.len(), 1);
    }

    #[test]
    fn interact_key_out_of_range_never_commits() {
        let mut app = headless_app(Vec2::new(-300.0, 0.0));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(INTERACT_KEY);

        for _ in 0..5 {
            app.update();
        }

        let received = app.world().resource::<Received>();
        assert!(received.selections.is_empty());
        assert!(received.ranges.is_empty());
        assert!(!app.world().resource::<InteractionState>().success_fired());
    }

    fn pointer_app(mode: InputMode, player: Vec2) -> App {
        let mut app = App::new();
        app.insert_resource(VignetteSettings::default())
            .insert_resource(mode)
            .insert_resource(WorldBounds::centered(Vec2::new(1280.0, 720.0)))
            .insert_resource(FrameClock::default())
            .init_resource::<InteractionState>()
            .init_resource::<PointerPresses>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Received>()
            .add_message::<ChoiceSelected>()
            .add_message::<ChoiceRangeChanged>()
            .add_systems(
                Update,
                (
                    commit_on_tap.run_if(touch_input_enabled),
                    set_move_target_from_pointer,
                    move_player,
                    count_notifications,
                )
                    .chain(),
            );

        app.world_mut().spawn((
            Transform::from_translation(player.extend(0.0)),
            Player,
            PlayerBody {
                offset: Vec2::ZERO,
                half_extent: Vec2::splat(16.0),
            },
            MoveTarget::default(),
            Facing::default(),
            PlayerMotion::default(),
        ));
        app.world_mut().spawn((
            Transform::from_xyz(40.0, 0.0, 0.0),
            Choice::new(0, "Yes"),
        ));
        app.world_mut().spawn((
            Transform::from_xyz(120.0, 0.0, 0.0),
            Choice::new(1, "You already said yes"),
        ));
        app
    }

    fn press_and_step(app: &mut App, at: Vec2) {
        app.world_mut()
            .resource_mut::<PointerPresses>()
            .set(vec![at]);
        app.world_mut()
            .resource_mut::<FrameClock>()
            .tick(std::time::Duration::from_secs_f32(1.0 / 60.0));
        app.update();
    }

    fn move_target(app: &mut App) -> Option<Vec2> {
        let world = app.world_mut();
        world
            .query_filtered::<&MoveTarget, With<Player>>()
            .single(world)
            .ok()
            .and_then(|target| target.0)
    }

    #[test]
    fn desktop_click_on_a_choice_only_moves() {
        let mut app = pointer_app(InputMode::Desktop, Vec2::ZERO);
        press_and_step(&mut app, Vec2::new(42.0, 3.0));

        assert!(app.world().resource::<Received>().selections.is_empty());
        assert!(!app.world().resource::<InteractionState>().success_fired());
        assert!(move_target(&mut app).is_some());
    }

    #[test]
    fn touch_tap_on_a_choice_commits_once_without_moving() {
        let mut app = pointer_app(InputMode::Touch, Vec2::ZERO);
        press_and_step(&mut app, Vec2::new(42.0, 3.0));

        let received = app.world().resource::<Received>();
        assert_eq!(received.selections.len(), 1);
        assert_eq!(received.selections[0].index, 0);
        assert_eq!(move_target(&mut app), None);

        // Once committed, taps are plain movement again.
        press_and_step(&mut app, Vec2::new(-200.0, 100.0));
        assert_eq!(app.world().resource::<Received>().selections.len(), 1);
        assert!(move_target(&mut app).is_some());
    }

    #[test]
    fn touch_tap_on_empty_ground_sets_a_move_target() {
        let mut app = pointer_app(InputMode::Touch, Vec2::ZERO);
        press_and_step(&mut app, Vec2::new(-200.0, 100.0));

        assert!(app.world().resource::<Received>().selections.is_empty());
        assert_eq!(move_target(&mut app), Some(Vec2::new(-200.0, 100.0)));
    }

    #[test]
    fn tap_at_the_range_edge_commits_before_the_player_steps_away() {
        let mut app = pointer_app(InputMode::Touch, Vec2::new(-39.5, 0.0));
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyA);
        press_and_step(&mut app, Vec2::new(40.0, 0.0));

        assert_eq!(app.world().resource::<Received>().selections.len(), 1);
        let world = app.world_mut();
        let player_x = world
            .query_filtered::<&Transform, With<Player>>()
            .single(world)
            .map(|transform| transform.translation.x)
            .unwrap_or_default();
        assert!(player_x < -40.5);
    }

    #[test]
    fn positions_are_ordered_by_index() {
        let choices = [
            (Choice::new(1, "b"), Transform::from_xyz(2.0, 0.0, 0.0)),
            (Choice::new(0, "a"), Transform::from_xyz(1.0, 0.0, 0.0)),
        ];
        let positions = ordered_choice_positions(choices.iter().map(|(c, t)| (c, t)));
        assert_eq!(positions, vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]);
    }
}
