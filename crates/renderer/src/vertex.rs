//! GPU-ready records for billboards and particles.

use bytemuck::{Pod, Zeroable};
use engine_core::{Transform, TransformRaw};

/// Teal used for the ambient particle cloud and elastic billboard text.
pub const TEAL: [f32; 4] = [0.0, 0.808, 0.820, 1.0];

/// Point size of ambient particles in world units.
pub const PARTICLE_SIZE: f32 = 0.2;

/// Opacity of the additive particle cloud.
pub const PARTICLE_OPACITY: f32 = 0.6;

/// Per-billboard instance data.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BillboardInstance {
    /// Model matrix (4x4)
    pub model: [[f32; 4]; 4],
    /// Colour tint; alpha carries the current opacity.
    pub color: [f32; 4],
    /// Backend surface this instance draws with.
    pub surface: u32,
    pub _pad: [u32; 3],
}

impl BillboardInstance {
    pub fn new(transform: &Transform, opacity: f32, surface: u32) -> Self {
        Self {
            model: TransformRaw::from(transform).model,
            color: [1.0, 1.0, 1.0, opacity.clamp(0.0, 1.0)],
            surface,
            _pad: [0; 3],
        }
    }

    pub fn opacity(&self) -> f32 {
        self.color[3]
    }
}

/// One particle position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
}

impl ParticleVertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    pub fn depth(&self) -> f32 {
        self.position[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn instance_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<BillboardInstance>(), 96);
        assert_eq!(std::mem::size_of::<ParticleVertex>(), 12);
    }

    #[test]
    fn instance_clamps_opacity() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(BillboardInstance::new(&t, 1.5, 0).opacity(), 1.0);
        assert_eq!(BillboardInstance::new(&t, -0.1, 0).opacity(), 0.0);
        assert_eq!(BillboardInstance::new(&t, 0.4, 7).surface, 7);
    }

    #[test]
    fn particle_bytes_cast() {
        let verts = [ParticleVertex::new(1.0, 2.0, 3.0), ParticleVertex::new(4.0, 5.0, 6.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 24);
        assert_eq!(verts[1].depth(), 6.0);
    }
}
