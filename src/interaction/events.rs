//! Messages broadcast by the choice controller.
use bevy::prelude::Message;

/// The one-shot success notification. Written at most once per session.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct ChoiceSelected {
    pub index: usize,
    pub label: String,
}

/// Edge-triggered proximity transitions.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceRangeChanged {
    Entered { index: usize },
    Left,
}
