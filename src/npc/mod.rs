//! NPC module: the single named NPC standing beside the clearing.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::NpcPlugin;
