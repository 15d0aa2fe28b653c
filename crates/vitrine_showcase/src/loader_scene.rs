//! Loading-screen animation
//!
//! Three wireframe polyhedra spinning on a ring inside a fixed 200×200
//! viewport. The scene keeps animating after the loader overlay is hidden.

use glam::Vec3;
use std::f32::consts::TAU;
use vitrine_presenter::{Document, FrameContext, SurfaceConfig, SurfaceSizing, Viewport};
use vitrine_render::{
    advance_euler, Color, Geometry, Light, Material, NodeId, PerspectiveCamera, ShapeKind,
};

pub const LOADER_CONTAINER: &str = "loader-3d-container";
pub const LOADER_SIZE: (u32, u32) = (200, 200);
pub const LOADER_CAMERA_Z: f32 = 8.0;

/// Group rotation added every frame (x, y)
pub const GROUP_SPIN: (f32, f32) = (0.02, 0.03);
/// Child rotation added every frame, multiplied by `i + 1`
pub const CHILD_SPIN: (f32, f32) = (0.01, 0.02);

const KINDS: [ShapeKind; 3] = [
    ShapeKind::Icosahedron,
    ShapeKind::Octahedron,
    ShapeKind::Tetrahedron,
];

struct Spinner {
    node: NodeId,
    rotation: Vec3,
}

pub struct LoaderScene {
    viewport: Viewport,
    group: NodeId,
    group_rotation: Vec3,
    spinners: Vec<Spinner>,
}

impl LoaderScene {
    /// Returns `None` when the loader container is absent
    pub fn mount(document: &mut dyn Document, surface: &SurfaceConfig) -> Option<Self> {
        let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 1000.0);
        camera.position.z = LOADER_CAMERA_Z;
        let mut viewport = Viewport::mount(
            document,
            LOADER_CONTAINER,
            SurfaceSizing::Fixed(LOADER_SIZE.0, LOADER_SIZE.1),
            surface,
            camera,
        )?;

        let scene = viewport.scene_mut();
        let root = scene.root();
        let group = scene.add_group(root, "loader");
        let mut spinners = Vec::with_capacity(KINDS.len());

        for (i, kind) in KINDS.iter().enumerate() {
            let hue = 200.0 + 40.0 * i as f32;
            let material = Material::phong(Color::from_hsl(hue, 1.0, 0.5))
                .with_emissive(Color::from_hsl(hue, 1.0, 0.3), 0.5)
                .with_wireframe(true);
            let node = scene.add_mesh(group, kind.name(), Geometry::from_shape(*kind, 1.0), material);

            let angle = i as f32 * TAU / 3.0;
            if let Some(transform) = scene.transform_mut(node) {
                transform.position = Vec3::new(angle.cos() * 2.0, 0.0, angle.sin() * 2.0);
            }
            spinners.push(Spinner {
                node,
                rotation: Vec3::ZERO,
            });
        }

        viewport.add_light(Light::ambient(0xffffff, 1.0));
        viewport.add_light(Light::point(0x0066ff, 2.0, Vec3::new(0.0, 0.0, 5.0)));
        viewport.set_continuous(true);

        Some(Self {
            viewport,
            group,
            group_rotation: Vec3::ZERO,
            spinners,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn group_rotation(&self) -> Vec3 {
        self.group_rotation
    }

    /// Current rotation of child `index`
    pub fn child_rotation(&self, index: usize) -> Option<Vec3> {
        self.spinners.get(index).map(|s| s.rotation)
    }

    pub fn frame(&mut self, _ctx: &FrameContext) {
        let scene = self.viewport.scene_mut();

        self.group_rotation = advance_euler(
            self.group_rotation,
            Vec3::new(GROUP_SPIN.0, GROUP_SPIN.1, 0.0),
        );
        if let Some(transform) = scene.transform_mut(self.group) {
            transform.set_euler(self.group_rotation);
        }

        for (i, spinner) in self.spinners.iter_mut().enumerate() {
            let factor = (i + 1) as f32;
            spinner.rotation = advance_euler(
                spinner.rotation,
                Vec3::new(CHILD_SPIN.0, CHILD_SPIN.1, 0.0) * factor,
            );
            if let Some(transform) = scene.transform_mut(spinner.node) {
                transform.set_euler(spinner.rotation);
            }
        }

        self.viewport.render_frame();
    }
}
