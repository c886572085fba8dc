//! Distance checks between the player's body centre and the choice targets.
use bevy::math::Vec2;

use crate::core::settings::radius_enabled;

/// Index of the nearest choice within `radius`, or `None`.
///
/// Ties resolve to the lowest index. An empty set or a non-positive radius
/// never yields a choice.
pub fn closest_within_radius(center: Vec2, choices: &[Vec2], radius: f32) -> Option<usize> {
    if !radius_enabled(radius) {
        return None;
    }

    let mut best: Option<(usize, f32)> = None;
    for (index, position) in choices.iter().enumerate() {
        let distance = center.distance(*position);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.filter(|(_, distance)| *distance <= radius)
        .map(|(index, _)| index)
}

/// Distance to the nearest choice, `None` when there are no choices.
pub fn min_distance(center: Vec2, choices: &[Vec2]) -> Option<f32> {
    choices
        .iter()
        .map(|position| center.distance(*position))
        .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.min(d))))
}
