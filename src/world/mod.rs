//! World module housing bounds, layout, optional assets and scenery.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
