//! Petal particle components, the ambient spawn budget and burst physics.
use bevy::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Soft pinks, reds and whites.
pub const PETAL_COLORS: [Color; 5] = [
    Color::srgb_u8(255, 180, 200),
    Color::srgb_u8(255, 140, 160),
    Color::srgb_u8(255, 200, 210),
    Color::srgb_u8(240, 100, 120),
    Color::srgb_u8(255, 220, 230),
];

/// Random source for every petal effect.
#[derive(Resource)]
pub struct PetalRng(pub StdRng);

impl PetalRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }

    pub fn unit(&mut self) -> f32 {
        self.0.gen::<f32>()
    }

    pub fn angle(&mut self) -> f32 {
        self.0.gen_range(0.0..std::f32::consts::TAU)
    }

    pub fn color(&mut self) -> Color {
        PETAL_COLORS
            .choose(&mut self.0)
            .copied()
            .unwrap_or(PETAL_COLORS[0])
    }
}

/// Spawn pacing for the ambient pool.
#[derive(Resource, Debug, Clone)]
pub struct AmbientSpawner {
    timer: f32,
    interval: f32,
    max: usize,
}

impl AmbientSpawner {
    pub fn new(interval: f32, max: usize) -> Self {
        Self {
            timer: 0.0,
            interval: interval.max(0.0),
            max,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn max(&self) -> usize {
        self.max
    }

    /// How many petals to spawn this frame given `live` petals already alive.
    ///
    /// Never lets `live + spawned` exceed the cap. At the cap the timer is
    /// cleared, so skipped spawns are dropped rather than queued.
    pub fn spawn_budget(&mut self, delta_seconds: f32, live: usize) -> usize {
        if live >= self.max {
            self.timer = 0.0;
            return 0;
        }
        if self.interval <= f32::EPSILON {
            self.timer = 0.0;
            return self.max - live;
        }

        self.timer += delta_seconds.max(0.0);
        let mut spawned = 0;
        while self.timer >= self.interval && live + spawned < self.max {
            self.timer -= self.interval;
            spawned += 1;
        }
        if live + spawned >= self.max {
            self.timer = 0.0;
        }
        spawned
    }
}

/// A decorative petal falling across the field.
#[derive(Component, Debug, Clone)]
pub struct AmbientPetal {
    pub origin_x: f32,
    pub fall_speed: f32,
    pub sway_offset: f32,
    pub age: f32,
}

impl AmbientPetal {
    /// Advances the petal and returns its new position given its current height.
    pub fn drift(&mut self, y: f32, delta_seconds: f32, amplitude: f32, frequency: f32) -> Vec2 {
        self.age += delta_seconds;
        Vec2::new(
            self.origin_x + (self.age * frequency + self.sway_offset).sin() * amplitude,
            y - self.fall_speed * delta_seconds,
        )
    }
}

/// One petal of a burst. The sprite lives on `entity`.
#[derive(Debug, Clone)]
pub struct BurstParticle {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
    pub age: f32,
}

/// Marker on the sprites owned by a [`PetalBurst`].
#[derive(Component, Debug)]
pub struct BurstPetal;

/// Emitter for a one-shot petal burst. Despawned once every particle expired.
#[derive(Component, Debug, Clone)]
pub struct PetalBurst {
    pub particles: Vec<BurstParticle>,
    pub lifetime: f32,
    pub gravity: f32,
    pub drag: f32,
}

impl PetalBurst {
    /// Steps every particle and removes the expired ones, returning their entities.
    pub fn advance(&mut self, delta_seconds: f32) -> Vec<Entity> {
        let mut expired = Vec::new();
        let (lifetime, gravity) = (self.lifetime, self.gravity);
        let damping = (1.0 - self.drag * delta_seconds).max(0.0);

        self.particles.retain_mut(|particle| {
            particle.age += delta_seconds;
            if particle.age >= lifetime {
                expired.push(particle.entity);
                return false;
            }
            particle.position += particle.velocity * delta_seconds;
            particle.velocity.y -= gravity * delta_seconds;
            particle.velocity.x *= damping;
            true
        });

        expired
    }

    pub fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Opaque for the first half of the lifetime, then linear to zero.
pub fn burst_alpha(age: f32, lifetime: f32) -> f32 {
    if lifetime <= f32::EPSILON {
        return 0.0;
    }
    let t = age / lifetime;
    if t < 0.5 {
        1.0
    } else {
        (1.0 - (t - 0.5) * 2.0).clamp(0.0, 1.0)
    }
}
