//! Tunables for the field. Every default reproduces the reference behaviour.
//!
//! Depth runs along Z with the viewpoint at the origin looking down -Z.
//! Forward motion carries objects toward +Z (toward the viewer); backward
//! motion carries them toward -Z.

use procgen::Variant;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BILLBOARD_COUNT: usize = 30;
pub const DEFAULT_PARTICLE_CAPACITY: usize = 1000;
pub const LERP_FACTOR: f32 = 0.05;
pub const DEFAULT_SPEED: f32 = 1.0;
pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Presentation style: layout, spawn ranges, opacity ranges.
    pub variant: Variant,
    pub billboard_count: usize,
    pub particle_capacity: usize,
    /// Fraction of the gap to the target speed closed per reference frame.
    pub lerp_factor: f32,
    pub default_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Multiplier applied to the target speed by a "slower" command.
    pub slower_step: f32,
    /// Multiplier applied to the target speed by a "faster" command.
    pub faster_step: f32,
    /// Forward billboards past this depth are recycled.
    pub near_recycle_z: f32,
    /// Backward billboards past this depth are recycled.
    pub far_recycle_z: f32,
    /// Backward billboards begin to fade beyond this depth...
    pub fade_start_z: f32,
    /// ...and are fully transparent here.
    pub fade_end_z: f32,
    /// Particle wrap boundaries.
    pub particle_far_z: f32,
    pub particle_near_z: f32,
    /// Where inactive particles are parked, well outside the view volume.
    pub hidden_particle_z: f32,
    /// Share of the particle buffer active at zero speed.
    pub particle_min_fraction: f32,
    /// Seed for spawn placement. `None` seeds from entropy.
    pub spawn_seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Elastic,
            billboard_count: DEFAULT_BILLBOARD_COUNT,
            particle_capacity: DEFAULT_PARTICLE_CAPACITY,
            lerp_factor: LERP_FACTOR,
            default_speed: DEFAULT_SPEED,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            slower_step: 0.9,
            faster_step: 1.1,
            near_recycle_z: 10.0,
            far_recycle_z: -150.0,
            fade_start_z: -50.0,
            fade_end_z: -150.0,
            particle_far_z: -200.0,
            particle_near_z: 10.0,
            hidden_particle_z: -10_000.0,
            particle_min_fraction: 0.1,
            spawn_seed: None,
        }
    }
}

impl FieldConfig {
    /// Copy with any out-of-range values pulled back to something usable.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();
        c.lerp_factor = c.lerp_factor.clamp(0.0, 1.0);
        c.min_speed = c.min_speed.max(0.0);
        c.max_speed = c.max_speed.max(c.min_speed);
        c.default_speed = c.default_speed.clamp(c.min_speed, c.max_speed);
        c.particle_min_fraction = c.particle_min_fraction.clamp(0.0, 1.0);
        if c.fade_end_z > c.fade_start_z {
            std::mem::swap(&mut c.fade_start_z, &mut c.fade_end_z);
        }
        if c.particle_far_z > c.particle_near_z {
            std::mem::swap(&mut c.particle_far_z, &mut c.particle_near_z);
        }
        c
    }
}
