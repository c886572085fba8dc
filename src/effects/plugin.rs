//! EffectsPlugin wires the ambient petal pool and the success burst.
use bevy::prelude::*;

use crate::{
    core::{plugin::FrameSet, settings::VignetteSettings},
    effects::{
        components::{AmbientSpawner, PetalRng},
        systems::{
            advance_petal_bursts, drift_ambient_petals, seed_ambient_petals, spawn_ambient_petals,
            trigger_petal_burst,
        },
    },
    world::plugin::SceneSetup,
};

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        let petals = app
            .world()
            .get_resource::<VignetteSettings>()
            .map(|settings| settings.petals.clone())
            .unwrap_or_else(|| VignetteSettings::default().petals);

        app.insert_resource(PetalRng::from_seed(petals.seed))
            .insert_resource(AmbientSpawner::new(
                petals.ambient_spawn_interval,
                petals.ambient_max,
            ))
            .add_systems(Startup, seed_ambient_petals.after(SceneSetup))
            .add_systems(
                Update,
                (
                    (spawn_ambient_petals, drift_ambient_petals).chain(),
                    (trigger_petal_burst, advance_petal_bursts).chain(),
                )
                    .in_set(FrameSet::Presentation),
            );

        match petals.seed {
            Some(seed) => info!("EffectsPlugin initialised with petal seed {}", seed),
            None => info!("EffectsPlugin initialised with an entropy-seeded petal rng"),
        }
    }
}
