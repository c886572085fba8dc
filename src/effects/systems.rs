//! Systems for ambient petals and the success burst.
use bevy::prelude::*;

use crate::{
    core::{
        plugin::FrameClock,
        settings::{PetalSettings, VignetteSettings},
    },
    effects::components::{
        burst_alpha, AmbientPetal, AmbientSpawner, BurstParticle, BurstPetal, PetalBurst, PetalRng,
    },
    interaction::events::ChoiceSelected,
    world::components::{SceneLayout, WorldBounds},
};

const AMBIENT_Z: f32 = 8.0;
const BURST_Z: f32 = 9.0;
const SPAWN_MARGIN: f32 = 10.0;
const DESPAWN_MARGIN: f32 = 20.0;
const SEEDED_MAX_AGE: f32 = 6.0;

/// Pre-seeds part of the pool across the full field height so the scene starts populated.
pub fn seed_ambient_petals(
    mut commands: Commands,
    settings: Res<VignetteSettings>,
    bounds: Res<WorldBounds>,
    mut rng: ResMut<PetalRng>,
) {
    let petals = &settings.petals;
    let count = (petals.ambient_max as f32 * petals.ambient_initial_fill).floor() as usize;
    for _ in 0..count {
        let y = bounds.min.y - SPAWN_MARGIN + rng.unit() * (bounds.height() + SPAWN_MARGIN * 2.0);
        let age = rng.unit() * SEEDED_MAX_AGE;
        spawn_ambient_petal(&mut commands, &mut rng, petals, &bounds, y, age);
    }
    info!(
        "Ambient petals seeded: {} of {}",
        count, petals.ambient_max
    );
}

/// Tops up the ambient pool at the configured interval.
pub fn spawn_ambient_petals(
    mut commands: Commands,
    clock: Res<FrameClock>,
    settings: Res<VignetteSettings>,
    bounds: Res<WorldBounds>,
    mut spawner: ResMut<AmbientSpawner>,
    mut rng: ResMut<PetalRng>,
    petals: Query<(), With<AmbientPetal>>,
) {
    let budget = spawner.spawn_budget(clock.delta_secs(), petals.iter().count());
    for _ in 0..budget {
        let y = bounds.max.y + SPAWN_MARGIN + rng.unit() * 30.0;
        spawn_ambient_petal(&mut commands, &mut rng, &settings.petals, &bounds, y, 0.0);
    }
}

fn spawn_ambient_petal(
    commands: &mut Commands,
    rng: &mut PetalRng,
    petals: &PetalSettings,
    bounds: &WorldBounds,
    y: f32,
    age: f32,
) {
    let size = petals.ambient_size.lerp(rng.unit());
    let x = bounds.min.x + rng.unit() * bounds.width();
    let color = rng.color().with_alpha(0.45 + rng.unit() * 0.3);

    commands.spawn((
        Sprite::from_color(color, Vec2::splat(size * 2.0)),
        Transform::from_xyz(x, y, AMBIENT_Z).with_rotation(Quat::from_rotation_z(rng.angle())),
        AmbientPetal {
            origin_x: x,
            fall_speed: petals.ambient_fall_speed.lerp(rng.unit()),
            sway_offset: rng.angle(),
            age,
        },
    ));
}

/// Moves ambient petals and removes those that fell below the field.
pub fn drift_ambient_petals(
    mut commands: Commands,
    clock: Res<FrameClock>,
    settings: Res<VignetteSettings>,
    bounds: Res<WorldBounds>,
    mut petals: Query<(Entity, &mut AmbientPetal, &mut Transform)>,
) {
    let delta = clock.delta_secs();
    let floor = bounds.min.y - DESPAWN_MARGIN;
    for (entity, mut petal, mut transform) in petals.iter_mut() {
        let next = petal.drift(
            transform.translation.y,
            delta,
            settings.petals.sway_amplitude,
            settings.petals.sway_frequency,
        );
        if next.y < floor {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Fires one burst at the clearing centre when a choice is committed.
pub fn trigger_petal_burst(
    mut commands: Commands,
    settings: Res<VignetteSettings>,
    layout: Res<SceneLayout>,
    mut rng: ResMut<PetalRng>,
    mut selections: MessageReader<ChoiceSelected>,
) {
    for selected in selections.read() {
        let petals = &settings.petals;
        let origin = layout.clearing_center;

        let particles: Vec<BurstParticle> = (0..petals.burst_count)
            .map(|_| {
                let direction = Vec2::from_angle(rng.angle());
                let speed = petals.burst_speed.lerp(rng.unit());
                let size = petals.burst_size.lerp(rng.unit());
                let entity = commands
                    .spawn((
                        Sprite::from_color(rng.color(), Vec2::splat(size * 2.0)),
                        Transform::from_translation(origin.extend(BURST_Z)),
                        BurstPetal,
                    ))
                    .id();
                BurstParticle {
                    entity,
                    position: origin,
                    velocity: direction * speed,
                    age: 0.0,
                }
            })
            .collect();

        info!(
            "Petal burst for \"{}\": {} petals",
            selected.label,
            particles.len()
        );
        commands.spawn((
            PetalBurst {
                particles,
                lifetime: petals.burst_lifetime,
                gravity: petals.burst_gravity,
                drag: petals.burst_drag,
            },
            Name::new("Petal Burst"),
        ));
    }
}

/// Steps bursts, fades their petals, and removes each emitter when it runs dry.
pub fn advance_petal_bursts(
    mut commands: Commands,
    clock: Res<FrameClock>,
    mut bursts: Query<(Entity, &mut PetalBurst)>,
    mut sprites: Query<(&mut Transform, &mut Sprite), With<BurstPetal>>,
) {
    let delta = clock.delta_secs();
    for (emitter, mut burst) in bursts.iter_mut() {
        for expired in burst.advance(delta) {
            commands.entity(expired).despawn();
        }

        let lifetime = burst.lifetime;
        for particle in burst.particles.iter() {
            let Ok((mut transform, mut sprite)) = sprites.get_mut(particle.entity) else {
                continue;
            };
            transform.translation.x = particle.position.x;
            transform.translation.y = particle.position.y;
            let alpha = burst_alpha(particle.age, lifetime);
            sprite.color = sprite.color.with_alpha(alpha);
        }

        if burst.is_finished() {
            debug!("Petal burst finished");
            commands.entity(emitter).despawn();
        }
    }
}
