//! Fixed viewpoint the field flies past.

use bytemuck::{Pod, Zeroable};
use engine_core::Transform;
use glam::{Mat4, Vec3};

/// Perspective camera with configurable FOV and clipping planes.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.transform.position;
        let target = eye + self.transform.forward();
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

/// Camera uniform data for GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4], // w unused, padding
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
        }
    }

    pub fn from_camera(camera: &Camera) -> Self {
        let mut uniform = Self::new();
        uniform.update(camera);
        uniform
    }

    pub fn update(&mut self, camera: &Camera) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        let pos = camera.position();
        self.position = [pos.x, pos.y, pos.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        let ahead = cam.view_matrix().transform_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!((ahead.z + 100.0).abs() < 1e-4);
        let clip = cam.view_projection_matrix().project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn aspect_guards_zero_height() {
        let mut cam = Camera::default();
        cam.set_aspect(800, 0);
        assert_eq!(cam.aspect, 800.0);
        cam.set_aspect(1280, 720);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_carries_position() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let u = CameraUniform::from_camera(&cam);
        assert_eq!(u.position, [1.0, 2.0, 3.0, 1.0]);
    }
}
