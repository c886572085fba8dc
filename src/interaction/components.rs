//! Components attached to choice targets and the interaction prompt.
use bevy::prelude::*;

use crate::core::fade::Fade;

/// An interactable choice. `index` is its registration order.
#[derive(Component, Debug, Clone)]
pub struct Choice {
    pub index: usize,
    pub label: String,
}

impl Choice {
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }
}

/// Text drawn on a choice; fades in with the NPC bubble.
#[derive(Component, Debug)]
pub struct ChoiceLabel {
    pub index: usize,
    pub fade: Fade,
}

/// The "(E) Interact" / "Tap" hint that follows the player while a choice is in range.
#[derive(Component, Debug)]
pub struct ChoicePrompt {
    pub fade: Fade,
}
