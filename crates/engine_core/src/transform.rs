//! Transform component and utilities for spatial positioning.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the facing normal of a flat surface (positive Z).
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Move along the depth axis.
    pub fn advance_depth(&mut self, delta: f32) {
        self.position.z += delta;
    }

    /// Orient so the local +Z axis points at `target`.
    ///
    /// Matches the convention of textured planes in most scene graphs: the
    /// visible face of a quad built in the XY plane ends up facing the target.
    /// Degenerate cases (target at our position, or straight along `up`) keep
    /// the previous rotation.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let facing = (target - self.position).normalize_or_zero();
        if facing == Vec3::ZERO || facing.cross(up).length_squared() < 1.0e-8 {
            return;
        }
        // look_at_rh builds a view matrix whose -Z looks at the target; the
        // inverse of an object looking *away* from the target gives +Z toward it.
        let away = self.position - (target - self.position);
        self.rotation = Quat::from_mat4(&Mat4::look_at_rh(self.position, away, up)).inverse();
    }
}

/// Raw transform data for GPU upload (instance data).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}
