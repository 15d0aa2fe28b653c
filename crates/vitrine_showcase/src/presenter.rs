//! Model presenter
//!
//! A [`ModelViewer`] shows one loaded model inside one viewport. It is created
//! with a pending [`ModelHandle`] and stays idle until the asset server hands
//! back the matching [`Completion`]:
//!
//! - on success the model is instantiated into the viewport scene, optionally
//!   re-materialed, normalized to `target_scale`, and framed by orbit controls;
//! - on failure a fallback glyph is placed in the container and no model node
//!   is ever attached.
//!
//! After a successful load the viewer advances its controls and idle motion
//! once per frame and renders.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vitrine_asset::{AssetServer, Completion, ModelHandle};
use vitrine_presenter::{
    Document, FrameContext, Glyph, OutputEncoding, SurfaceConfig, SurfaceSizing, ToneMapping,
    Viewport,
};
use vitrine_render::{
    Light, LightRig, Material, MaterialKind, NodeId, NodeKind, OrbitControls, OrbitInput,
    PerspectiveCamera,
};

use crate::normalize::{self, Normalization};

/// Vertical field of view of viewer cameras (degrees)
pub const VIEWER_FOV: f32 = 45.0;
pub const VIEWER_NEAR: f32 = 0.1;
pub const VIEWER_FAR: f32 = 1000.0;
/// Camera distance once a model is in place
pub const VIEWER_CAMERA_Z: f32 = 5.0;
/// Name of the model root node inside a viewer scene
pub const MODEL_NODE: &str = "model";

/// Continuous yaw and vertical bob applied on top of the normalized pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdleMotion {
    /// Radians per second around the vertical axis
    pub yaw_rate: f32,
    /// Bob angular frequency per millisecond
    pub bob_frequency: f32,
    /// Bob amplitude in world units
    pub bob_amplitude: f32,
}

impl IdleMotion {
    /// 0.005 rad per frame at 60 Hz, bob of 0.1
    pub const ROBOT: Self = Self {
        yaw_rate: 0.3,
        bob_frequency: 0.001,
        bob_amplitude: 0.1,
    };

    /// 0.003 rad per frame at 60 Hz, bob of 0.05
    pub const WALLY: Self = Self {
        yaw_rate: 0.18,
        bob_frequency: 0.0008,
        bob_amplitude: 0.05,
    };

    /// Yaw at `elapsed_secs`, wrapped into `[0, 2π)`
    pub fn yaw_at(&self, elapsed_secs: f64) -> f32 {
        (elapsed_secs * self.yaw_rate as f64).rem_euclid(std::f64::consts::TAU) as f32
    }

    pub fn bob_at(&self, elapsed_ms: f64) -> f32 {
        ((elapsed_ms * self.bob_frequency as f64).sin() * self.bob_amplitude as f64) as f32
    }
}

/// Replacement material applied to every mesh of a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialOverride {
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
}

impl MaterialOverride {
    pub const GENERIC: Self = Self {
        metalness: 0.6,
        roughness: 0.4,
        double_sided: true,
    };

    /// Swap every mesh below `root` to a standard material, keeping its base
    /// color and texture. Returns the number of meshes touched.
    pub fn apply(&self, scene: &mut vitrine_render::SceneGraph, root: NodeId) -> usize {
        let mut touched = 0;
        for id in scene.descendants(root) {
            let Some(mesh) = scene.node_mut(id).and_then(|n| n.mesh_mut()) else {
                continue;
            };
            let mut material = Material::standard(mesh.material.color, self.metalness, self.roughness)
                .with_double_sided(self.double_sided);
            material.base_color_texture = mesh.material.base_color_texture;
            mesh.material = material;
            mesh.cast_shadow = true;
            mesh.receive_shadow = true;
            touched += 1;
        }
        touched
    }
}

/// How a model is presented once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct PresentOptions {
    /// Largest dimension after normalization
    pub target_scale: f32,
    /// Orbit auto-rotation speed (1.0 = one turn per minute)
    pub auto_rotate_speed: f32,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub idle_motion: Option<IdleMotion>,
    pub material_override: Option<MaterialOverride>,
    /// Placeholder shown when the load fails
    pub fallback: Glyph,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            target_scale: 3.0,
            auto_rotate_speed: 1.0,
            enable_zoom: false,
            enable_pan: true,
            idle_motion: None,
            material_override: None,
            fallback: Glyph::new("fas fa-cube"),
        }
    }
}

/// Everything needed to mount a viewer in a named container
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub container: String,
    pub path: PathBuf,
    pub lights: LightRig,
    pub surface: SurfaceConfig,
    pub options: PresentOptions,
}

impl ViewerConfig {
    /// Hero viewer with tone-mapped output and the shared material override
    pub fn generic(container: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            container: container.into(),
            path: path.into(),
            lights: LightRig::new()
                .with(Light::ambient(0xffffff, 0.7))
                .with(Light::directional(0xffffff, 1.0, Vec3::new(5.0, 10.0, 7.5)))
                .with(Light::directional(0xffffff, 0.5, Vec3::new(-5.0, -10.0, -5.0))),
            surface: SurfaceConfig::default()
                .with_tone_mapping(ToneMapping::AcesFilmic { exposure: 1.2 })
                .with_output_encoding(OutputEncoding::Srgb),
            options: PresentOptions {
                material_override: Some(MaterialOverride::GENERIC),
                ..Default::default()
            },
        }
    }

    pub fn azure() -> Self {
        Self::generic("model-container-1", "models/AZURE3D.glb")
    }

    pub fn cisco() -> Self {
        Self::generic("model-container-2", "models/cisco.glb")
    }

    /// Robot in the experience section
    pub fn robot() -> Self {
        Self {
            container: "experiencia-3d-right".to_string(),
            path: PathBuf::from("models/ROBOT1.glb"),
            lights: LightRig::new()
                .with(Light::ambient(0xffffff, 0.7))
                .with(Light::directional(0xe74c3c, 0.8, Vec3::new(5.0, 5.0, 5.0)))
                .with(Light::point(0x9b59b6, 0.5, Vec3::new(-5.0, -5.0, 5.0))),
            surface: SurfaceConfig::default(),
            options: PresentOptions {
                target_scale: 3.0,
                auto_rotate_speed: 2.0,
                enable_zoom: false,
                enable_pan: false,
                idle_motion: Some(IdleMotion::ROBOT),
                material_override: None,
                fallback: Glyph::new("fas fa-robot").with_color("#e74c3c"),
            },
        }
    }

    /// Wally in the education section
    pub fn wally() -> Self {
        Self {
            container: "formacion-wally-3d".to_string(),
            path: PathBuf::from("models/wally.glb"),
            lights: LightRig::new()
                .with(Light::ambient(0xffffff, 0.8))
                .with(Light::directional(0x3498db, 0.8, Vec3::new(5.0, 5.0, 5.0)))
                .with(Light::point(0x2980b9, 0.5, Vec3::new(-5.0, 3.0, 3.0))),
            surface: SurfaceConfig::default(),
            options: PresentOptions {
                target_scale: 3.5,
                auto_rotate_speed: 1.5,
                enable_zoom: false,
                enable_pan: false,
                idle_motion: Some(IdleMotion::WALLY),
                material_override: None,
                fallback: Glyph::new("fas fa-graduation-cap").with_color("#3498db"),
            },
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.surface = self.surface.with_pixel_ratio(pixel_ratio);
        self
    }
}

/// Viewer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Loading,
    Ready,
    Failed,
}

/// A viewport presenting one model
pub struct ModelViewer {
    viewport: Viewport,
    handle: ModelHandle,
    options: PresentOptions,
    state: ViewerState,
    model: Option<NodeId>,
    normalization: Option<Normalization>,
    controls: Option<OrbitControls>,
    pending_input: OrbitInput,
}

/// Mount a viewer in `config.container` and request its model.
///
/// Returns `None` when the container does not exist.
pub fn mount_viewer(
    document: &mut dyn Document,
    assets: &AssetServer,
    config: &ViewerConfig,
) -> Option<ModelViewer> {
    let camera = PerspectiveCamera::new(VIEWER_FOV, 1.0, VIEWER_NEAR, VIEWER_FAR);
    let mut viewport = Viewport::mount(
        document,
        &config.container,
        SurfaceSizing::Container,
        &config.surface,
        camera,
    )?;
    viewport.add_lights(&config.lights);
    Some(present(viewport, assets, &config.path, config.options.clone()))
}

/// Request `path` for `viewport`; the returned viewer waits for its completion
pub fn present(
    viewport: Viewport,
    assets: &AssetServer,
    path: impl AsRef<Path>,
    options: PresentOptions,
) -> ModelViewer {
    let handle = assets.load(path);
    log::debug!(
        "Viewer '{}' waiting for {} ({})",
        viewport.container(),
        handle.path().display(),
        handle.id()
    );
    ModelViewer {
        viewport,
        handle,
        options,
        state: ViewerState::Loading,
        model: None,
        normalization: None,
        controls: None,
        pending_input: OrbitInput::default(),
    }
}

impl ModelViewer {
    pub fn container(&self) -> &str {
        self.viewport.container()
    }

    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ViewerState::Ready
    }

    pub fn options(&self) -> &PresentOptions {
        &self.options
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Root node of the loaded model
    pub fn model(&self) -> Option<NodeId> {
        self.model
    }

    pub fn normalization(&self) -> Option<Normalization> {
        self.normalization
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    /// Queue pointer input for the next frame
    pub fn push_input(&mut self, input: &OrbitInput) {
        self.pending_input.rotate_delta.0 += input.rotate_delta.0;
        self.pending_input.rotate_delta.1 += input.rotate_delta.1;
        self.pending_input.pan_delta.0 += input.pan_delta.0;
        self.pending_input.pan_delta.1 += input.pan_delta.1;
        self.pending_input.zoom_delta += input.zoom_delta;
    }

    /// Consume the completion for this viewer's request.
    ///
    /// Returns `false` when the completion belongs to another request or the
    /// viewer already settled.
    pub fn complete(&mut self, document: &mut dyn Document, completion: &Completion) -> bool {
        if completion.handle != self.handle || self.state != ViewerState::Loading {
            return false;
        }

        match &completion.result {
            Ok(model) => {
                let (camera, scene) = self.viewport.parts_mut();
                let parent = scene.root();
                let root = model.instantiate(scene, parent, MODEL_NODE);
                if let Some(material) = self.options.material_override {
                    material.apply(scene, root);
                }

                self.normalization = normalize::normalize_node(scene, root, self.options.target_scale);

                camera.position = Vec3::new(0.0, 0.0, VIEWER_CAMERA_Z);
                let controls = OrbitControls::new(camera, Vec3::ZERO)
                    .with_auto_rotate(self.options.auto_rotate_speed)
                    .with_zoom(self.options.enable_zoom)
                    .with_pan(self.options.enable_pan);
                camera.look_at(controls.target);

                self.controls = Some(controls);
                self.model = Some(root);
                self.state = ViewerState::Ready;
                self.viewport.set_continuous(true);

                log::info!(
                    "{} loaded into '{}' ({} meshes, {:.1?})",
                    self.handle.path().display(),
                    self.viewport.container(),
                    model.mesh_count(),
                    completion.elapsed
                );
            }
            Err(e) => {
                self.state = ViewerState::Failed;
                log::error!(
                    "Failed to load {} for '{}': {}",
                    self.handle.path().display(),
                    self.viewport.container(),
                    e
                );
                document.append_glyph(self.viewport.container(), self.options.fallback.clone());
            }
        }
        true
    }

    /// Advance controls and idle motion, then render. No-op until loaded.
    pub fn frame(&mut self, ctx: &FrameContext) {
        if self.state != ViewerState::Ready {
            return;
        }

        let input = std::mem::take(&mut self.pending_input);
        let (camera, scene) = self.viewport.parts_mut();
        if let Some(controls) = self.controls.as_mut() {
            controls.update(camera, &input, ctx.delta_secs());
        }

        if let (Some(motion), Some(root)) = (self.options.idle_motion, self.model) {
            let offset = self
                .normalization
                .map(|n| n.offset)
                .unwrap_or(Normalization::IDENTITY.offset);
            if let Some(transform) = scene.transform_mut(root) {
                transform.rotation = Quat::from_rotation_y(motion.yaw_at(ctx.elapsed.as_secs_f64()));
                transform.position = offset + Vec3::Y * motion.bob_at(ctx.elapsed_ms());
            }
        }

        self.viewport.render_frame();
    }

    /// Number of mesh nodes currently attached under the model root
    pub fn mesh_count(&self) -> usize {
        let Some(root) = self.model else {
            return 0;
        };
        let scene = self.viewport.scene();
        scene
            .descendants(root)
            .into_iter()
            .filter(|id| matches!(scene.node(*id).map(|n| &n.kind), Some(NodeKind::Mesh(_))))
            .count()
    }

    /// Materials of the attached meshes, in graph order
    pub fn material_kinds(&self) -> Vec<MaterialKind> {
        let Some(root) = self.model else {
            return Vec::new();
        };
        let scene = self.viewport.scene();
        scene
            .descendants(root)
            .into_iter()
            .filter_map(|id| scene.node(id).and_then(|n| n.mesh()))
            .map(|mesh| mesh.material.kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use std::time::Duration;
    use vitrine_asset::{AssetServerConfig, MemoryLoader, ModelScene};
    use vitrine_presenter::MemoryDocument;
    use vitrine_render::{Color, Geometry};

    fn assets(loader: MemoryLoader) -> AssetServer {
        let config = AssetServerConfig {
            asset_dir: PathBuf::from(""),
            worker_threads: 0,
        };
        AssetServer::new(config, Arc::new(loader))
    }

    fn document() -> MemoryDocument {
        MemoryDocument::new(1280, 720)
            .with_element("model-container-1", (400, 300))
            .with_element("experiencia-3d-right", (500, 500))
    }

    fn ctx(frame: u64, ms: u64) -> FrameContext {
        FrameContext::new(frame, Duration::from_millis(ms), Duration::from_millis(16))
    }

    fn cube_model(edge: f32) -> ModelScene {
        let mut material = Material::phong(Color::from_hex(0x336699));
        material.base_color_texture = Some(2);
        ModelScene::from_geometry("cube", Geometry::cuboid(edge, edge, edge), material)
    }

    #[test]
    fn test_generic_viewer_override_and_controls() {
        let server = assets(MemoryLoader::new().with("models/AZURE3D.glb", cube_model(10.0)));
        let mut doc = document();
        let mut viewer = mount_viewer(&mut doc, &server, &ViewerConfig::azure()).unwrap();
        assert_eq!(viewer.state(), ViewerState::Loading);
        assert_eq!(viewer.viewport().lights().len(), 3);

        for completion in server.poll() {
            assert!(viewer.complete(&mut doc, &completion));
        }
        assert!(viewer.is_ready());
        assert_eq!(viewer.material_kinds(), vec![MaterialKind::Standard]);

        let scene = viewer.viewport().scene();
        let mesh_id = scene.descendants(viewer.model().unwrap())[1];
        let mesh = scene.node(mesh_id).and_then(|n| n.mesh()).unwrap();
        assert_eq!(mesh.material.color, Color::from_hex(0x336699));
        assert_eq!(mesh.material.base_color_texture, Some(2));
        assert_relative_eq!(mesh.material.metalness, 0.6);
        assert_relative_eq!(mesh.material.roughness, 0.4);
        assert!(mesh.material.double_sided);
        assert!(mesh.cast_shadow && mesh.receive_shadow);

        let controls = viewer.controls().unwrap();
        assert!(!controls.enable_zoom);
        assert!(controls.enable_pan);
        assert_relative_eq!(controls.auto_rotate_speed, 1.0);
        assert_eq!(viewer.viewport().camera().position, Vec3::new(0.0, 0.0, VIEWER_CAMERA_Z));
    }

    #[test]
    fn test_frames_wait_for_model() {
        let server = assets(MemoryLoader::new().with("models/ROBOT1.glb", cube_model(2.0)));
        let mut doc = document();
        let mut viewer = mount_viewer(&mut doc, &server, &ViewerConfig::robot()).unwrap();

        viewer.frame(&ctx(1, 16));
        assert_eq!(viewer.viewport().frames_rendered(), 0);

        for completion in server.poll() {
            viewer.complete(&mut doc, &completion);
        }
        viewer.frame(&ctx(2, 32));
        viewer.frame(&ctx(3, 48));
        assert_eq!(viewer.viewport().frames_rendered(), 2);
    }

    #[test]
    fn test_idle_motion_adds_bob_to_offset() {
        let server = assets(MemoryLoader::new().with("models/ROBOT1.glb", cube_model(6.0)));
        let mut doc = document();
        let mut viewer = mount_viewer(&mut doc, &server, &ViewerConfig::robot()).unwrap();
        for completion in server.poll() {
            viewer.complete(&mut doc, &completion);
        }
        let offset = viewer.normalization().unwrap().offset;

        viewer.frame(&ctx(1, 1500));
        let root = viewer.model().unwrap();
        let transform = *viewer.viewport().scene().transform(root).unwrap();
        let expected_bob = (1500.0f64 * 0.001).sin() as f32 * 0.1;
        assert_relative_eq!(transform.position.y, offset.y + expected_bob, epsilon = 1e-6);

        let (axis, angle) = transform.rotation.to_axis_angle();
        assert_relative_eq!(angle, 0.3 * 1.5, epsilon = 1e-4);
        assert_relative_eq!(axis.y, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_auto_rotate_moves_camera_without_zoom() {
        let server = assets(MemoryLoader::new().with("models/ROBOT1.glb", cube_model(2.0)));
        let mut doc = document();
        let mut viewer = mount_viewer(&mut doc, &server, &ViewerConfig::robot()).unwrap();
        for completion in server.poll() {
            viewer.complete(&mut doc, &completion);
        }

        viewer.push_input(&OrbitInput {
            zoom_delta: 10.0,
            ..Default::default()
        });
        viewer.frame(&ctx(1, 1000));
        let camera = viewer.viewport().camera();
        assert!(camera.position.x.abs() > 1e-4);
        assert_relative_eq!(camera.position.length(), VIEWER_CAMERA_Z, epsilon = 1e-4);
    }

    #[test]
    fn test_foreign_completion_ignored() {
        let loader = MemoryLoader::new()
            .with("models/AZURE3D.glb", cube_model(1.0))
            .with("models/ROBOT1.glb", cube_model(1.0));
        let server = assets(loader);
        let mut doc = document();
        let mut azure = mount_viewer(&mut doc, &server, &ViewerConfig::azure()).unwrap();
        let _other = server.load("models/ROBOT1.glb");

        let completions = server.poll();
        assert_eq!(completions.len(), 2);
        let accepted = completions
            .iter()
            .filter(|c| azure.complete(&mut doc, c))
            .count();
        assert_eq!(accepted, 1);
        // A second delivery of the same completion is refused
        assert!(!azure.complete(&mut doc, &completions[0]));
    }

    #[test]
    fn test_missing_container() {
        let server = assets(MemoryLoader::new());
        let mut doc = document();
        assert!(mount_viewer(&mut doc, &server, &ViewerConfig::wally()).is_none());
        assert_eq!(server.pending_count(), 0);
    }

    #[test]
    fn test_idle_presets() {
        assert_relative_eq!(IdleMotion::ROBOT.yaw_at(1.0 / 60.0), 0.005, epsilon = 1e-6);
        assert_relative_eq!(IdleMotion::WALLY.yaw_at(1.0 / 60.0), 0.003, epsilon = 1e-6);
        assert_eq!(IdleMotion::WALLY.bob_at(0.0), 0.0);
    }

    #[test]
    fn test_idle_yaw_after_long_runs() {
        // Ten hours in, one 60 Hz frame still turns the robot by 0.005 rad
        let start = 36_000.0;
        let a = IdleMotion::ROBOT.yaw_at(start);
        let b = IdleMotion::ROBOT.yaw_at(start + 1.0 / 60.0);
        assert!((0.0..std::f32::consts::TAU).contains(&a));
        assert_relative_eq!((b - a).rem_euclid(std::f32::consts::TAU), 0.005, epsilon = 1e-5);
    }
}
