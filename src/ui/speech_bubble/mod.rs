// src/ui/speech_bubble/mod.rs
//
// Speech bubble module for the NPC and player lines.
//
// - NPC bubble with name tag: question, too-close and success lines
// - Player bubble echoing the closest (or chosen) rose label
// - Typewriter reveal and pop-in scale/alpha transitions
// - Rose labels fading in with the NPC bubble

pub mod components;
pub mod events;
pub mod plugin;
pub mod systems;
pub mod typewriter;

pub use plugin::SpeechBubblePlugin;
