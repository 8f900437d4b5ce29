//! Prompt billboards: placement, motion, fading, and when to replace them.

use crate::config::FieldConfig;
use crate::motion::Direction;
use engine_core::Transform;
use glam::{Vec2, Vec3};
use procgen::Variant;
use rand::Rng;
use renderer::{BillboardInstance, SurfaceDesc, SurfaceId};

/// Vertical offset of the tunnel axis below the viewpoint.
pub const RING_CENTER_Y: f32 = -5.0;
/// Inner radius of the billboard ring.
pub const RING_RADIUS: f32 = 15.0;

/// A live billboard. Replaced wholesale when recycled, never edited in place.
#[derive(Debug, Clone)]
pub struct Billboard {
    pub text: String,
    /// Generation index the text came from.
    pub generation_index: u64,
    pub transform: Transform,
    /// Depth units per reference frame at speed 1.
    pub velocity: f32,
    pub base_opacity: f32,
    pub opacity: f32,
    /// World-space width and height.
    pub size: Vec2,
    pub surface: SurfaceId,
}

/// Random placement for a freshly spawned billboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub velocity: f32,
    pub base_opacity: f32,
}

impl Placement {
    /// Sample a ring position, a depth, a velocity, and an opacity.
    ///
    /// The angle is uniform around the ring and the radius is banded, so
    /// billboards do not pile up along one ray. Depth is spread over a range
    /// on the incoming side for `direction`, so a full pool does not arrive at
    /// one instant.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, direction: Direction, variant: Variant) -> Self {
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        let radius = match variant {
            Variant::Elastic => RING_RADIUS + rng.gen_range(0..3) as f32 * 5.0,
            Variant::Classic => RING_RADIUS + rng.gen::<f32>() * 10.0,
        };
        let depth = match (direction, variant) {
            (Direction::Forward, _) => -50.0 - rng.gen::<f32>() * 100.0,
            (Direction::Backward, Variant::Elastic) => 10.0 + rng.gen::<f32>() * 100.0,
            (Direction::Backward, Variant::Classic) => 5.0 + rng.gen::<f32>() * 15.0,
        };
        let base_opacity = match variant {
            Variant::Elastic => 0.3 + rng.gen::<f32>() * 0.5,
            Variant::Classic => 0.5 + rng.gen::<f32>() * 0.5,
        };
        Self {
            position: Vec3::new(angle.cos() * radius, angle.sin() * radius + RING_CENTER_Y, depth),
            velocity: 2.0 + rng.gen::<f32>(),
            base_opacity,
        }
    }
}

impl Billboard {
    /// Assemble a billboard around a surface the backend already built.
    pub fn spawn(
        text: String,
        generation_index: u64,
        placement: Placement,
        desc: &SurfaceDesc,
        surface: SurfaceId,
        viewpoint: Vec3,
    ) -> Self {
        let mut transform = Transform::from_position(placement.position);
        transform.look_at(viewpoint, Vec3::Y);
        Self {
            text,
            generation_index,
            transform,
            velocity: placement.velocity,
            base_opacity: placement.base_opacity,
            opacity: placement.base_opacity,
            size: Vec2::new(desc.width, desc.height),
            surface,
        }
    }

    pub fn depth(&self) -> f32 {
        self.transform.position.z
    }

    /// Face the viewpoint, move by `step` (signed depth per unit velocity), refresh opacity.
    pub fn update(&mut self, step: f32, direction: Direction, viewpoint: Vec3, config: &FieldConfig) {
        self.transform.look_at(viewpoint, Vec3::Y);
        self.transform.advance_depth(self.velocity * step);
        self.opacity = opacity_at(self.depth(), self.base_opacity, direction, config);
    }

    /// Whether this billboard has left the field for the current direction.
    pub fn should_recycle(&self, direction: Direction, config: &FieldConfig) -> bool {
        match direction {
            Direction::Forward => self.depth() > config.near_recycle_z,
            Direction::Backward => self.depth() < config.far_recycle_z,
        }
    }

    pub fn instance(&self) -> BillboardInstance {
        let mut transform = self.transform;
        transform.scale = Vec3::new(self.size.x, self.size.y, 1.0);
        BillboardInstance::new(&transform, self.opacity, self.surface.0)
    }
}

/// Opacity for a billboard at `depth`.
///
/// Approaching billboards never fade. Receding ones keep `base` until
/// `fade_start_z`, then fall linearly to zero at `fade_end_z`.
pub fn opacity_at(depth: f32, base: f32, direction: Direction, config: &FieldConfig) -> f32 {
    let base = base.clamp(0.0, 1.0);
    if direction == Direction::Forward || depth >= config.fade_start_z {
        return base;
    }
    let span = config.fade_start_z - config.fade_end_z;
    if span <= 0.0 {
        return 0.0;
    }
    let progress = ((config.fade_start_z - depth) / span).clamp(0.0, 1.0);
    base * (1.0 - progress)
}
