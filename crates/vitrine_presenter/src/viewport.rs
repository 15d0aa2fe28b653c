//! Viewport
//!
//! A viewport binds one render surface to one camera and one scene graph.
//! It is created the first time its container is used and lives as long as
//! the page. The camera pose is mirrored into a camera node and lights are
//! added as light nodes of the scene graph.

use crate::document::Document;
use crate::surface::{RenderSurface, SurfaceConfig};
use glam::Quat;
use vitrine_render::{Light, LightRig, NodeId, NodeKind, PerspectiveCamera, SceneGraph};

/// How the surface size is chosen at mount time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSizing {
    /// Fill the container's client size
    Container,
    /// Fixed size in CSS pixels
    Fixed(u32, u32),
    /// Window inner size
    Window,
}

/// One rendering context inside a page container
pub struct Viewport {
    container: String,
    surface: Box<dyn RenderSurface>,
    camera: PerspectiveCamera,
    scene: SceneGraph,
    lights: LightRig,
    camera_node: NodeId,
    continuous: bool,
    frames_rendered: u64,
    frames_failed: u64,
}

impl Viewport {
    /// Create a viewport inside `container`.
    ///
    /// Returns `None` when the container does not exist in the document.
    pub fn mount(
        document: &mut dyn Document,
        container: &str,
        sizing: SurfaceSizing,
        config: &SurfaceConfig,
        mut camera: PerspectiveCamera,
    ) -> Option<Self> {
        if !document.element_exists(container) {
            log::debug!("Container '{}' not found, skipping viewport", container);
            return None;
        }

        let (width, height) = match sizing {
            SurfaceSizing::Container => document.element_size(container)?,
            SurfaceSizing::Fixed(w, h) => (w, h),
            SurfaceSizing::Window => document.window_size(),
        };

        let Some(surface) = document.mount_surface(container, (width, height), config) else {
            log::warn!("Could not create a render surface in '{}'", container);
            return None;
        };

        camera.set_viewport_size(width, height);
        let mut scene = SceneGraph::new();
        let camera_node = scene.add(scene.root(), "camera", NodeKind::Camera);

        let mut viewport = Self {
            container: container.to_string(),
            surface,
            camera,
            scene,
            lights: LightRig::new(),
            camera_node,
            continuous: false,
            frames_rendered: 0,
            frames_failed: 0,
        };
        viewport.sync_camera_node();

        log::debug!("Mounted viewport in '{}' at {}x{}", container, width, height);
        Some(viewport)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    /// Camera and scene together, for updates that touch both
    pub fn parts_mut(&mut self) -> (&mut PerspectiveCamera, &mut SceneGraph) {
        (&mut self.camera, &mut self.scene)
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    pub fn add_light(&mut self, light: Light) -> NodeId {
        self.lights = std::mem::take(&mut self.lights).with(light);
        let root = self.scene.root();
        self.scene.add_light(root, light)
    }

    pub fn add_lights(&mut self, rig: &LightRig) {
        for light in rig.lights() {
            self.add_light(*light);
        }
    }

    /// Mark the viewport as animated by a continuous loop
    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Match the surface size; camera aspect becomes exactly `width / height`
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport_size(width, height);
        self.surface.resize(width, height);
    }

    /// Draw the current scene through the current camera.
    ///
    /// Surface errors are logged and the frame is skipped.
    pub fn render_frame(&mut self) {
        self.sync_camera_node();
        match self.surface.render(&self.scene, &self.camera) {
            Ok(()) => self.frames_rendered += 1,
            Err(e) => {
                self.frames_failed += 1;
                log::warn!("Viewport '{}' failed to render: {}", self.container, e);
            }
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn frames_failed(&self) -> u64 {
        self.frames_failed
    }

    fn sync_camera_node(&mut self) {
        let rotation = Quat::from_mat4(&self.camera.view_matrix().inverse());
        if let Some(transform) = self.scene.transform_mut(self.camera_node) {
            transform.position = self.camera.position;
            transform.rotation = rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn document() -> MemoryDocument {
        MemoryDocument::new(1920, 1080)
            .with_element("model-container-1", (400, 300))
            .with_element("canvas-3d", (0, 0))
    }

    #[test]
    fn test_mount_missing_container() {
        let mut doc = document();
        let viewport = Viewport::mount(
            &mut doc,
            "experiencia-3d-right",
            SurfaceSizing::Container,
            &SurfaceConfig::default(),
            PerspectiveCamera::default(),
        );
        assert!(viewport.is_none());
    }

    #[test]
    fn test_mount_sizes() {
        let mut doc = document();
        let viewer = Viewport::mount(
            &mut doc,
            "model-container-1",
            SurfaceSizing::Container,
            &SurfaceConfig::default(),
            PerspectiveCamera::default(),
        )
        .unwrap();
        assert_eq!(viewer.size(), (400, 300));
        assert_relative_eq!(viewer.camera().aspect, 400.0 / 300.0);

        let background = Viewport::mount(
            &mut doc,
            "canvas-3d",
            SurfaceSizing::Window,
            &SurfaceConfig::default(),
            PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0),
        )
        .unwrap();
        assert_eq!(background.size(), (1920, 1080));
    }

    #[test]
    fn test_resize_sets_exact_aspect() {
        let mut doc = document();
        let mut viewport = Viewport::mount(
            &mut doc,
            "canvas-3d",
            SurfaceSizing::Fixed(200, 200),
            &SurfaceConfig::default(),
            PerspectiveCamera::default(),
        )
        .unwrap();

        for (w, h) in [(1920, 1080), (333, 777), (1, 1), (800, 600)] {
            viewport.resize(w, h);
            assert_eq!(viewport.camera().aspect, w as f32 / h as f32);
            assert_eq!(viewport.size(), (w, h));
        }

        viewport.resize(800, 600);
        assert_eq!(viewport.camera().aspect, 800.0 / 600.0);

        viewport.resize(640, 0);
        assert_eq!(viewport.camera().aspect, 640.0);
        assert_eq!(viewport.size(), (640, 0));
    }

    #[test]
    fn test_render_failures_are_swallowed() {
        let mut doc = document();
        let mut viewport = Viewport::mount(
            &mut doc,
            "model-container-1",
            SurfaceSizing::Container,
            &SurfaceConfig::default(),
            PerspectiveCamera::default(),
        )
        .unwrap();
        doc.surface_stats("model-container-1").unwrap().fail_next(1);

        viewport.render_frame();
        viewport.render_frame();
        assert_eq!(viewport.frames_failed(), 1);
        assert_eq!(viewport.frames_rendered(), 1);
    }

    #[test]
    fn test_camera_and_lights_are_nodes() {
        let mut doc = document();
        let mut viewport = Viewport::mount(
            &mut doc,
            "model-container-1",
            SurfaceSizing::Container,
            &SurfaceConfig::default(),
            PerspectiveCamera::default(),
        )
        .unwrap();
        viewport.add_lights(
            &LightRig::new()
                .with(Light::ambient(0xffffff, 0.7))
                .with(Light::directional(0xffffff, 1.0, Vec3::new(5.0, 10.0, 7.5))),
        );
        viewport.camera_mut().position = Vec3::new(0.0, 0.0, 5.0);
        viewport.render_frame();

        let camera_node = viewport.scene().find("camera").unwrap();
        assert_eq!(
            viewport.scene().transform(camera_node).unwrap().position,
            Vec3::new(0.0, 0.0, 5.0)
        );
        assert_eq!(viewport.lights().len(), 2);
        let stats = doc.surface_stats("model-container-1").unwrap().snapshot();
        assert_eq!(stats.last_light_count, 2);
    }
}
