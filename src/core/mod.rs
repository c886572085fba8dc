//! Core module: settings, frame clock, input mode and shared easing.
pub mod fade;
pub mod input;
pub mod plugin;
pub mod settings;

pub use plugin::CorePlugin;
