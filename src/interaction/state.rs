//! One-shot selection state machine owned by the choice controller systems.
use bevy::prelude::*;

use super::{events::ChoiceRangeChanged, proximity::closest_within_radius};
use crate::core::settings::radius_enabled;

/// Observable phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoicePhase {
    OutOfRange,
    InRange,
    Committed,
}

/// Single-writer interaction state. Everything outside `interaction::systems`
/// only reads it.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct InteractionState {
    success_fired: bool,
    in_range: bool,
    closest: Option<usize>,
    selected: Option<usize>,
}

impl InteractionState {
    pub fn phase(&self) -> ChoicePhase {
        if self.success_fired {
            ChoicePhase::Committed
        } else if self.in_range {
            ChoicePhase::InRange
        } else {
            ChoicePhase::OutOfRange
        }
    }

    pub fn success_fired(&self) -> bool {
        self.success_fired
    }

    pub fn in_range(&self) -> bool {
        self.in_range
    }

    /// Nearest in-range choice as of the last observation.
    pub fn closest(&self) -> Option<usize> {
        self.closest
    }

    /// Set exactly when `success_fired` is.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Records this frame's proximity result and reports range edges.
    ///
    /// Frozen once committed.
    pub fn observe(&mut self, closest: Option<usize>) -> Option<ChoiceRangeChanged> {
        if self.success_fired {
            return None;
        }

        let was_in_range = self.in_range;
        self.closest = closest;
        self.in_range = closest.is_some();

        match (was_in_range, closest) {
            (false, Some(index)) => Some(ChoiceRangeChanged::Entered { index }),
            (true, None) => Some(ChoiceRangeChanged::Left),
            _ => None,
        }
    }

    /// Commits to the closest in-range choice (interact key path).
    pub fn commit_closest(&mut self) -> Option<usize> {
        match (self.in_range, self.closest) {
            (true, Some(index)) => self.commit(index),
            _ => None,
        }
    }

    /// Commits to the first tapped choice that is also within reach of the player.
    pub fn commit_tap(
        &mut self,
        tap: Vec2,
        player_center: Vec2,
        choices: &[Vec2],
        proximity_radius: f32,
        tap_radius: f32,
    ) -> Option<usize> {
        if self.success_fired {
            return None;
        }
        let index = tapped_choice(tap, player_center, choices, proximity_radius, tap_radius)?;
        self.commit(index)
    }

    /// The only transition into `Committed`. Returns `None` once already committed.
    pub fn commit(&mut self, index: usize) -> Option<usize> {
        if self.success_fired {
            return None;
        }
        self.success_fired = true;
        self.selected = Some(index);
        Some(index)
    }
}

fn tapped_choice(
    tap: Vec2,
    player_center: Vec2,
    choices: &[Vec2],
    proximity_radius: f32,
    tap_radius: f32,
) -> Option<usize> {
    if !radius_enabled(tap_radius) || !radius_enabled(proximity_radius) {
        return None;
    }

    choices.iter().position(|position| {
        tap.distance(*position) <= tap_radius
            && player_center.distance(*position) <= proximity_radius
    })
}

/// Runs one proximity observation for the given positions.
pub fn observe_positions(
    state: &mut InteractionState,
    player_center: Vec2,
    choices: &[Vec2],
    proximity_radius: f32,
) -> Option<ChoiceRangeChanged> {
    let closest = closest_within_radius(player_center, choices, proximity_radius);
    state.observe(closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 80.0;
    const TAP_RADIUS: f32 = 60.0;

    fn two_choices() -> [Vec2; 2] {
        [Vec2::new(0.0, 0.0), Vec2::new(160.0, 0.0)]
    }

    #[test]
    fn starts_idle_out_of_range() {
        let state = InteractionState::default();
        assert_eq!(state.phase(), ChoicePhase::OutOfRange);
        assert!(!state.success_fired());
        assert_eq!(state.closest(), None);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn range_edges_fire_once_per_transition() {
        let mut state = InteractionState::default();
        let choices = two_choices();

        let far = Vec2::new(-200.0, 0.0);
        assert_eq!(observe_positions(&mut state, far, &choices, RADIUS), None);

        let near_first = Vec2::new(-40.0, 0.0);
        assert_eq!(
            observe_positions(&mut state, near_first, &choices, RADIUS),
            Some(ChoiceRangeChanged::Entered { index: 0 })
        );
        assert_eq!(state.phase(), ChoicePhase::InRange);

        // Staying in range, even while switching target, is not an edge.
        assert_eq!(observe_positions(&mut state, near_first, &choices, RADIUS), None);
        let near_second = Vec2::new(150.0, 0.0);
        assert_eq!(observe_positions(&mut state, near_second, &choices, RADIUS), None);
        assert_eq!(state.closest(), Some(1));

        assert_eq!(
            observe_positions(&mut state, far, &choices, RADIUS),
            Some(ChoiceRangeChanged::Left)
        );
        assert_eq!(state.phase(), ChoicePhase::OutOfRange);
        assert_eq!(state.closest(), None);
    }

    #[test]
    fn interact_key_commits_closest_in_range_choice() {
        let mut state = InteractionState::default();
        // 40 from choice 0, 120 from choice 1.
        let choices = [Vec2::new(40.0, 0.0), Vec2::new(120.0, 0.0)];
        observe_positions(&mut state, Vec2::ZERO, &choices, RADIUS);

        assert_eq!(state.commit_closest(), Some(0));
        assert_eq!(state.selected(), Some(0));
        assert_eq!(state.phase(), ChoicePhase::Committed);
    }

    #[test]
    fn interact_key_out_of_range_is_ignored() {
        let mut state = InteractionState::default();
        observe_positions(&mut state, Vec2::new(-500.0, 0.0), &two_choices(), RADIUS);

        assert_eq!(state.commit_closest(), None);
        assert!(!state.success_fired());
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn commit_is_idempotent_and_freezes_state() {
        let mut state = InteractionState::default();
        let choices = two_choices();
        observe_positions(&mut state, Vec2::new(10.0, 0.0), &choices, RADIUS);
        assert_eq!(state.commit_closest(), Some(0));

        let mut commits = 0;
        for step in 0..50 {
            let player = Vec2::new(step as f32 * 10.0 - 100.0, 0.0);
            assert_eq!(observe_positions(&mut state, player, &choices, RADIUS), None);
            if state.commit_closest().is_some() {
                commits += 1;
            }
            if state.commit(1).is_some() {
                commits += 1;
            }
            if state
                .commit_tap(choices[1], choices[1], &choices, RADIUS, TAP_RADIUS)
                .is_some()
            {
                commits += 1;
            }
        }

        assert_eq!(commits, 0);
        assert_eq!(state.selected(), Some(0));
        assert_eq!(state.closest(), Some(0));
        assert_eq!(state.phase(), ChoicePhase::Committed);
    }

    #[test]
    fn tap_requires_player_in_range_of_the_tapped_choice() {
        let mut state = InteractionState::default();
        let choices = two_choices();
        let player = Vec2::new(-30.0, 0.0);
        observe_positions(&mut state, player, &choices, RADIUS);

        assert_eq!(
            state.commit_tap(choices[1], player, &choices, RADIUS, TAP_RADIUS),
            None
        );
        assert!(!state.success_fired());

        let miss = Vec2::new(0.0, 100.0);
        assert_eq!(state.commit_tap(miss, player, &choices, RADIUS, TAP_RADIUS), None);

        let near_rose = Vec2::new(20.0, 20.0);
        assert_eq!(
            state.commit_tap(near_rose, player, &choices, RADIUS, TAP_RADIUS),
            Some(0)
        );
        assert_eq!(
            state.commit_tap(near_rose, player, &choices, RADIUS, TAP_RADIUS),
            None
        );
    }

    #[test]
    fn disabled_radii_keep_controller_inactive() {
        let mut state = InteractionState::default();
        let choices = two_choices();

        assert_eq!(observe_positions(&mut state, Vec2::ZERO, &choices, 0.0), None);
        assert_eq!(state.commit_closest(), None);
        assert_eq!(
            state.commit_tap(Vec2::ZERO, Vec2::ZERO, &choices, RADIUS, -1.0),
            None
        );
        assert_eq!(observe_positions(&mut state, Vec2::ZERO, &[], RADIUS), None);
        assert_eq!(state.phase(), ChoicePhase::OutOfRange);
    }
}
