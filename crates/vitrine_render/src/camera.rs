//! Perspective camera

use glam::{Mat4, Vec3};

/// Perspective camera with a look-at target.
///
/// `fov` is the vertical field of view in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub up: Vec3,
    target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            up: Vec3::Y,
            target: Vec3::NEG_Z,
        }
    }

    /// Aim the camera at a point
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// The point the camera is aimed at
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Set the aspect ratio from pixel dimensions; zero height is treated as one
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        let target = if (self.target - self.position).length_squared() > f32::EPSILON {
            self.target
        } else {
            self.position + Vec3::NEG_Z
        };
        Mat4::look_at_rh(self.position, target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(45.0, 1.0, 0.1, 1000.0)
    }
}
