//! Orbit camera controls
//!
//! The camera sits on a sphere around a target point. Pointer drags rotate
//! it, wheel input changes the radius and right-drags move the target. When
//! auto-rotation is on, the camera circles the target at
//! `2π / 60 * auto_rotate_speed` radians per second.

use crate::camera::PerspectiveCamera;
use crate::scene::wrap_angle;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Seconds per revolution at auto-rotate speed 1.0
pub const AUTO_ROTATE_PERIOD_SECS: f32 = 60.0;

/// User input accumulated since the last update
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrbitInput {
    /// Rotate drag delta in pixels
    pub rotate_delta: (f32, f32),
    /// Pan drag delta in pixels
    pub pan_delta: (f32, f32),
    /// Wheel delta; positive moves the camera closer
    pub zoom_delta: f32,
}

impl OrbitInput {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Orbit controller driving a [`PerspectiveCamera`]
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    /// Radians per pixel of drag
    pub rotate_sensitivity: f32,
    /// World units per pixel of pan, scaled by distance
    pub pan_sensitivity: f32,
    pub zoom_speed: f32,
    /// Min/max camera distance
    pub distance_range: (f32, f32),
    /// Azimuth around the up axis (radians)
    yaw: f32,
    /// Polar angle measured from the up axis (radians)
    polar: f32,
    distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_sensitivity: TAU / 1000.0,
            pan_sensitivity: 0.002,
            zoom_speed: 1.0,
            distance_range: (0.0, f32::INFINITY),
            yaw: 0.0,
            polar: PI / 2.0,
            distance: 1.0,
        }
    }
}

impl OrbitControls {
    /// Create controls orbiting `target`, starting from the camera's current position
    pub fn new(camera: &PerspectiveCamera, target: Vec3) -> Self {
        let mut controls = Self {
            target,
            ..Default::default()
        };
        controls.sync_from_camera(camera);
        controls
    }

    pub fn with_auto_rotate(mut self, speed: f32) -> Self {
        self.auto_rotate = true;
        self.auto_rotate_speed = speed;
        self
    }

    pub fn with_zoom(mut self, enabled: bool) -> Self {
        self.enable_zoom = enabled;
        self
    }

    pub fn with_pan(mut self, enabled: bool) -> Self {
        self.enable_pan = enabled;
        self
    }

    /// Re-read spherical coordinates after the camera was moved externally
    pub fn sync_from_camera(&mut self, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        self.distance = offset.length();
        if self.distance > f32::EPSILON {
            self.yaw = offset.x.atan2(offset.z);
            self.polar = (offset.y / self.distance).clamp(-1.0, 1.0).acos();
        } else {
            self.yaw = 0.0;
            self.polar = PI / 2.0;
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Apply input and auto-rotation, then place the camera
    pub fn update(&mut self, camera: &mut PerspectiveCamera, input: &OrbitInput, delta_time: f32) {
        if self.auto_rotate {
            self.yaw -= TAU / AUTO_ROTATE_PERIOD_SECS * self.auto_rotate_speed * delta_time;
        }

        if self.enable_rotate {
            self.yaw -= input.rotate_delta.0 * self.rotate_sensitivity;
            self.polar -= input.rotate_delta.1 * self.rotate_sensitivity;
        }
        self.yaw = wrap_angle(self.yaw);
        // Keep off the poles so the up vector stays well defined
        self.polar = self.polar.clamp(1e-4, PI - 1e-4);

        if self.enable_zoom && input.zoom_delta.abs() > f32::EPSILON {
            let scale = 0.95f32.powf(self.zoom_speed * input.zoom_delta.abs());
            self.distance = if input.zoom_delta > 0.0 {
                self.distance * scale
            } else {
                self.distance / scale
            };
        }
        self.distance = self.distance.clamp(self.distance_range.0, self.distance_range.1);

        if self.enable_pan && (input.pan_delta.0 != 0.0 || input.pan_delta.1 != 0.0) {
            let forward = (self.target - camera.position).normalize_or_zero();
            let right = forward.cross(camera.up).normalize_or_zero();
            let up = right.cross(forward);
            let scale = self.pan_sensitivity * self.distance;
            self.target += (-right * input.pan_delta.0 + up * input.pan_delta.1) * scale;
        }

        let offset = Vec3::new(
            self.polar.sin() * self.yaw.sin(),
            self.polar.cos(),
            self.polar.sin() * self.yaw.cos(),
        ) * self.distance;

        camera.position = self.target + offset;
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera_at_z(z: f32) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 1000.0);
        camera.position = Vec3::new(0.0, 0.0, z);
        camera
    }

    #[test]
    fn test_sync_keeps_position() {
        let mut camera = camera_at_z(5.0);
        let mut controls = OrbitControls::new(&camera, Vec3::ZERO);
        controls.update(&mut camera, &OrbitInput::default(), 0.0);

        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, 5.0, epsilon = 1e-5);
        assert_eq!(camera.target(), Vec3::ZERO);
    }

    #[test]
    fn test_auto_rotate_rate() {
        let mut camera = camera_at_z(5.0);
        let mut controls = OrbitControls::new(&camera, Vec3::ZERO).with_auto_rotate(2.0);

        // Speed 2 completes a revolution in 30 seconds
        controls.update(&mut camera, &OrbitInput::default(), 7.5);
        assert_relative_eq!(controls.yaw(), 1.5 * PI, epsilon = 1e-5);
        assert_relative_eq!(camera.position.x, -5.0, epsilon = 1e-4);
        assert_relative_eq!(camera.position.length(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_auto_rotate_after_long_runs() {
        let mut camera = camera_at_z(5.0);
        let mut controls = OrbitControls::new(&camera, Vec3::ZERO).with_auto_rotate(1.0);
        controls.yaw = -50_000.0;

        let dt = 1.0 / 60.0;
        controls.update(&mut camera, &OrbitInput::default(), dt);
        let before = controls.yaw();
        assert!((0.0..TAU).contains(&before));

        controls.update(&mut camera, &OrbitInput::default(), dt);
        let step = (before - controls.yaw()).rem_euclid(TAU);
        assert_relative_eq!(step, TAU / AUTO_ROTATE_PERIOD_SECS * dt, epsilon = 2e-6);
    }

    #[test]
    fn test_zoom_disabled_ignores_wheel() {
        let mut camera = camera_at_z(5.0);
        let mut controls = OrbitControls::new(&camera, Vec3::ZERO).with_zoom(false);
        let input = OrbitInput {
            zoom_delta: 10.0,
            ..Default::default()
        };
        controls.update(&mut camera, &input, 0.016);
        assert_relative_eq!(controls.distance(), 5.0, epsilon = 1e-5);

        controls.enable_zoom = true;
        controls.update(&mut camera, &input, 0.016);
        assert!(controls.distance() < 5.0);
    }

    #[test]
    fn test_pan_moves_target_only_when_enabled() {
        let mut camera = camera_at_z(5.0);
        let mut controls = OrbitControls::new(&camera, Vec3::ZERO).with_pan(false);
        let input = OrbitInput {
            pan_delta: (100.0, 0.0),
            ..Default::default()
        };
        controls.update(&mut camera, &input, 0.016);
        assert_eq!(controls.target, Vec3::ZERO);

        controls.enable_pan = true;
        controls.update(&mut camera, &input, 0.016);
        assert!(controls.target.x < 0.0);
        assert!(input.is_idle() == false);
    }
}
