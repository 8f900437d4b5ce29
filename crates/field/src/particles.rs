//! Ambient particle cloud with a fixed buffer and a speed-driven active count.

use crate::config::FieldConfig;
use crate::motion::Direction;
use crate::billboard::RING_CENTER_Y;
use rand::Rng;
use renderer::{ParticleBufferId, ParticleVertex};

/// Particles spawn within this radius of the tunnel axis.
pub const PARTICLE_SPREAD: f32 = 30.0;

/// How many particles are live at `speed`.
///
/// Rises linearly from `min_fraction` of the buffer at speed 0 to the whole
/// buffer at speed 1, then stays saturated. Non-decreasing in `speed`.
pub fn active_particle_count(speed: f32, capacity: usize, min_fraction: f32) -> usize {
    let cap = capacity as f32;
    let floor = cap * min_fraction.clamp(0.0, 1.0);
    let speed = if speed.is_nan() { 0.0 } else { speed.max(0.0) };
    let count = (floor + speed * (cap - floor)).min(cap).floor();
    (count as usize).min(capacity)
}

/// Fixed-capacity particle storage. Slots are never added or removed.
#[derive(Debug)]
pub struct ParticleField {
    vertices: Vec<ParticleVertex>,
    velocities: Vec<f32>,
    active: usize,
    buffer: ParticleBufferId,
}

impl ParticleField {
    /// Scatter `capacity` particles through the tunnel volume.
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: &FieldConfig, buffer: ParticleBufferId) -> Self {
        let capacity = config.particle_capacity;
        let depth_span = config.particle_near_z.min(0.0) - config.particle_far_z;
        let mut vertices = Vec::with_capacity(capacity);
        let mut velocities = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let radius = rng.gen::<f32>() * PARTICLE_SPREAD;
            vertices.push(ParticleVertex::new(
                angle.cos() * radius,
                angle.sin() * radius + RING_CENTER_Y,
                config.particle_near_z.min(0.0) - rng.gen::<f32>() * depth_span,
            ));
            velocities.push(2.0 + rng.gen::<f32>());
        }
        Self {
            vertices,
            velocities,
            active: capacity,
            buffer,
        }
    }

    pub fn capacity(&self) -> usize {
        self.vertices.len()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn buffer(&self) -> ParticleBufferId {
        self.buffer
    }

    /// The whole buffer, hidden slots included.
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    /// Recompute the active count from `speed` and move particles by `step`.
    ///
    /// Active particles that leave through one boundary re-enter at the
    /// other. Inactive ones are parked at the hidden depth; when they become
    /// active again they enter from the incoming boundary.
    pub fn update(&mut self, speed: f32, step: f32, direction: Direction, config: &FieldConfig) {
        self.active = active_particle_count(speed, self.capacity(), config.particle_min_fraction);
        let (entry, exit) = match direction {
            Direction::Forward => (config.particle_far_z, config.particle_near_z),
            Direction::Backward => (config.particle_near_z, config.particle_far_z),
        };

        for (i, (vertex, velocity)) in self.vertices.iter_mut().zip(&self.velocities).enumerate() {
            let z = &mut vertex.position[2];
            if i >= self.active {
                *z = config.hidden_particle_z;
                continue;
            }
            if *z <= config.hidden_particle_z {
                *z = entry;
            }
            *z += velocity * step;
            let escaped = match direction {
                Direction::Forward => *z > exit,
                Direction::Backward => *z < exit,
            };
            if escaped {
                *z = entry;
            }
        }
    }
}
