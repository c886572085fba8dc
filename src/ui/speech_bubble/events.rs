// src/ui/speech_bubble/events.rs
//
// Messages written by the bubble systems.

use bevy::prelude::Message;

use super::components::BubbleSpeaker;

/// A bubble's typewriter revealed its full line. Never sent for a cancelled reveal.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct TypewriterFinished {
    pub speaker: BubbleSpeaker,
    pub text: String,
}
