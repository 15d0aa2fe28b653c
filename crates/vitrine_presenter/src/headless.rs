//! Headless surface
//!
//! Walks the scene like a real backend would, but instead of issuing draw
//! calls it records what would have been drawn. Statistics live behind a
//! shared handle so they stay readable after the surface is boxed and handed
//! to a viewport.

use crate::surface::{RenderSurface, SurfaceConfig, SurfaceError};
use glam::Vec3;
use parking_lot::Mutex;
use std::sync::Arc;
use vitrine_render::{NodeKind, PerspectiveCamera, SceneGraph};

/// What the last frames looked like
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceStats {
    pub frames_rendered: u64,
    pub frames_failed: u64,
    /// CSS size
    pub size: (u32, u32),
    /// Backing buffer size
    pub physical_size: (u32, u32),
    pub resize_count: u64,
    pub last_draw_calls: usize,
    pub last_vertex_count: usize,
    pub last_point_count: usize,
    pub last_light_count: usize,
    pub last_camera_position: Vec3,
    pub last_camera_aspect: f32,
    /// Frames that will still fail before rendering resumes
    pub pending_failures: u32,
}

/// Shared view on a headless surface's statistics
#[derive(Debug, Clone, Default)]
pub struct SurfaceStatsHandle(Arc<Mutex<SurfaceStats>>);

impl SurfaceStatsHandle {
    pub fn snapshot(&self) -> SurfaceStats {
        self.0.lock().clone()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.0.lock().frames_rendered
    }

    /// Make the next `frames` render calls fail with [`SurfaceError::Lost`]
    pub fn fail_next(&self, frames: u32) {
        self.0.lock().pending_failures = frames;
    }
}

/// Surface that renders nowhere
pub struct HeadlessSurface {
    config: SurfaceConfig,
    size: (u32, u32),
    stats: SurfaceStatsHandle,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32, config: SurfaceConfig) -> Self {
        let surface = Self {
            size: (width, height),
            stats: SurfaceStatsHandle::default(),
            config,
        };
        {
            let mut stats = surface.stats.0.lock();
            stats.size = surface.size;
            stats.physical_size = surface.config.physical_size(width, height);
        }
        surface
    }

    pub fn stats(&self) -> SurfaceStatsHandle {
        self.stats.clone()
    }
}

impl RenderSurface for HeadlessSurface {
    fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        let mut stats = self.stats.0.lock();
        stats.size = self.size;
        stats.physical_size = self.config.physical_size(width, height);
        stats.resize_count += 1;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), SurfaceError> {
        let mut stats = self.stats.0.lock();
        if stats.pending_failures > 0 {
            stats.pending_failures -= 1;
            stats.frames_failed += 1;
            return Err(SurfaceError::Lost);
        }
        if !camera.aspect.is_finite() || camera.aspect <= 0.0 {
            stats.frames_failed += 1;
            return Err(SurfaceError::InvalidCamera(format!("aspect {}", camera.aspect)));
        }

        let mut draw_calls = 0;
        let mut vertices = 0;
        let mut points = 0;
        let mut lights = 0;
        for id in scene.visible_nodes() {
            let Some(node) = scene.node(id) else {
                continue;
            };
            match &node.kind {
                NodeKind::Mesh(mesh) => {
                    draw_calls += 1;
                    vertices += mesh.geometry.vertex_count();
                }
                NodeKind::Points(cloud) => {
                    draw_calls += 1;
                    points += cloud.positions.len();
                }
                NodeKind::Grid(_) => draw_calls += 1,
                NodeKind::Light(_) => lights += 1,
                NodeKind::Group | NodeKind::Camera => {}
            }
        }

        stats.frames_rendered += 1;
        stats.last_draw_calls = draw_calls;
        stats.last_vertex_count = vertices;
        stats.last_point_count = points;
        stats.last_light_count = lights;
        stats.last_camera_position = camera.position;
        stats.last_camera_aspect = camera.aspect;
        Ok(())
    }
}
