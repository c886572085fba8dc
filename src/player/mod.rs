//! Player module: spawning, keyboard and pointer movement, facing indicator.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
