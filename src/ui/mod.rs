// src/ui/mod.rs
//
// UI module providing the in-world dialogue presentation.

pub mod speech_bubble;

pub use speech_bubble::SpeechBubblePlugin;
