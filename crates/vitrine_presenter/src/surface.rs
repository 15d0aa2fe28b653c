//! Surface abstraction
//!
//! Represents the renderable target inside a page container. Surfaces are
//! created by the [`Document`](crate::document::Document) that owns the
//! container and are driven by a [`Viewport`](crate::viewport::Viewport).

use serde::{Deserialize, Serialize};
use vitrine_render::{PerspectiveCamera, SceneGraph};

/// Surface error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("Surface creation failed: {0}")]
    CreationFailed(String),

    #[error("Surface lost")]
    Lost,

    #[error("Surface outdated")]
    Outdated,

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),
}

/// Tone mapping applied to the final color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToneMapping {
    None,
    AcesFilmic { exposure: f32 },
}

/// Encoding of the color written to the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputEncoding {
    Linear,
    Srgb,
}

/// Surface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Device pixels per CSS pixel
    pub pixel_ratio: f32,
    /// Transparent clear color
    pub alpha: bool,
    pub antialias: bool,
    pub tone_mapping: ToneMapping,
    pub output_encoding: OutputEncoding,
    pub shadows: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            alpha: true,
            antialias: true,
            tone_mapping: ToneMapping::None,
            output_encoding: OutputEncoding::Linear,
            shadows: false,
        }
    }
}

impl SurfaceConfig {
    /// Set pixel ratio
    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio.max(0.1);
        self
    }

    pub fn with_tone_mapping(mut self, tone_mapping: ToneMapping) -> Self {
        self.tone_mapping = tone_mapping;
        self
    }

    pub fn with_output_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.output_encoding = encoding;
        self
    }

    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    /// Size of the backing buffer for a CSS-pixel size
    pub fn physical_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            (width as f32 * self.pixel_ratio).round() as u32,
            (height as f32 * self.pixel_ratio).round() as u32,
        )
    }
}

/// Abstract surface trait
pub trait RenderSurface {
    /// Get current configuration
    fn config(&self) -> &SurfaceConfig;

    /// Current size in CSS pixels
    fn size(&self) -> (u32, u32);

    /// Resize the drawing buffer
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame of `scene` as seen by `camera`
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), SurfaceError>;
}
