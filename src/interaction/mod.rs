//! Choice interaction: proximity tracking, one-shot commit and its notifications.
pub mod components;
pub mod events;
pub mod plugin;
pub mod proximity;
pub mod state;
pub mod systems;
pub mod telemetry;

pub use plugin::InteractionPlugin;
