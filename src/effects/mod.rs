//! Decorative petal effects: a capped ambient pool and a one-shot success burst.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::EffectsPlugin;
