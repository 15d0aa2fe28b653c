//! Light rigs

use crate::color::Color;
use glam::Vec3;

/// A single light source
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// Uniform light from every direction
    Ambient { color: Color, intensity: f32 },
    /// Parallel rays shining from `position` towards the origin
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
    /// Omnidirectional light at `position`
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

impl Light {
    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Self::Ambient {
            color: Color::from_hex(hex),
            intensity,
        }
    }

    pub fn directional(hex: u32, intensity: f32, position: Vec3) -> Self {
        Self::Directional {
            color: Color::from_hex(hex),
            intensity,
            position,
        }
    }

    pub fn point(hex: u32, intensity: f32, position: Vec3) -> Self {
        Self::Point {
            color: Color::from_hex(hex),
            intensity,
            position,
        }
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Self::Ambient { intensity, .. }
            | Self::Directional { intensity, .. }
            | Self::Point { intensity, .. } => *intensity,
        }
    }

    /// World position, if the light has one
    pub fn position(&self) -> Option<Vec3> {
        match self {
            Self::Ambient { .. } => None,
            Self::Directional { position, .. } | Self::Point { position, .. } => Some(*position),
        }
    }
}

/// Ordered set of lights belonging to one viewport
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightRig {
    lights: Vec<Light>,
}

impl LightRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}
