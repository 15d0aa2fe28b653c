//! Surface materials

use crate::color::Color;

/// Shading model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    /// Blinn-Phong shading
    Phong,
    /// PBR metallic-roughness shading
    Standard,
    /// Screen-space points
    Points,
    /// Unlit lines
    Line,
}

/// Framebuffer blending
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Blending {
    #[default]
    Normal,
    Additive,
}

/// Material description consumed by render surfaces
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub wireframe: bool,
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
    pub blending: Blending,
    pub vertex_colors: bool,
    /// Point size (points materials only)
    pub size: f32,
    /// Index of the base color texture in the owning model, if any
    pub base_color_texture: Option<usize>,
}

impl Material {
    fn base(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            metalness: 0.0,
            roughness: 1.0,
            double_sided: false,
            blending: Blending::Normal,
            vertex_colors: false,
            size: 1.0,
            base_color_texture: None,
        }
    }

    pub fn phong(color: Color) -> Self {
        Self::base(MaterialKind::Phong, color)
    }

    pub fn standard(color: Color, metalness: f32, roughness: f32) -> Self {
        Self {
            metalness,
            roughness,
            ..Self::base(MaterialKind::Standard, color)
        }
    }

    pub fn points(size: f32) -> Self {
        Self {
            size,
            ..Self::base(MaterialKind::Points, Color::WHITE)
        }
    }

    pub fn line(color: Color) -> Self {
        Self::base(MaterialKind::Line, color)
    }

    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    /// Set opacity; anything below 1 marks the material transparent
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.opacity < 1.0;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        self
    }

    pub fn with_vertex_colors(mut self, vertex_colors: bool) -> Self {
        self.vertex_colors = vertex_colors;
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Color::WHITE, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_marks_transparent() {
        let m = Material::phong(Color::WHITE).with_opacity(0.4);
        assert!(m.transparent);
        assert_eq!(Material::phong(Color::WHITE).with_opacity(1.0).transparent, false);
    }

    #[test]
    fn test_default_is_gltf_default() {
        let m = Material::default();
        assert_eq!(m.kind, MaterialKind::Standard);
        assert_eq!(m.metalness, 1.0);
        assert_eq!(m.roughness, 1.0);
    }
}
