//! Background scene
//!
//! Full-window decoration behind the page: a particle field, floating
//! primitive shapes and a grid, seen through a slowly drifting camera.
//! Everything is generated once at mount time and then only animated.

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::sync::Arc;
use vitrine_presenter::{Document, FrameContext, SurfaceConfig, SurfaceSizing, Viewport};
use vitrine_render::{
    advance_angle, advance_euler, Blending, Color, Geometry, GridHelper, Light, Material, NodeId,
    NodeKind, PerspectiveCamera, PointCloud, ShapeKind,
};

pub const BACKGROUND_FOV: f32 = 75.0;
pub const CAMERA_BASE: Vec3 = Vec3::new(0.0, 5.0, 30.0);

/// Particle field yaw added every frame (radians)
pub const PARTICLE_YAW_STEP: f32 = 0.0005;
pub const PARTICLE_SIZE: f32 = 0.3;
pub const PARTICLE_OPACITY: f32 = 0.8;

/// Circumscribed radius / ring radius / edge of the floating shapes
pub const SHAPE_SIZE: f32 = 2.0;
/// Scale applied to `sin(t * float_speed) * float_amplitude`
pub const FLOAT_STEP: f32 = 0.02;

pub const GRID_SIZE: f32 = 100.0;
pub const GRID_DIVISIONS: u32 = 50;
pub const GRID_Y: f32 = -10.0;

/// Background generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    /// Container holding the background canvas
    pub container: String,
    pub particle_count: usize,
    /// Edge length of the cube particles are spread over
    pub particle_spread: f32,
    pub shape_count: usize,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            container: "canvas-3d".to_string(),
            particle_count: 2000,
            particle_spread: 100.0,
            shape_count: 15,
            seed: None,
        }
    }
}

/// Static point cloud that only spins
#[derive(Debug, Clone)]
pub struct ParticleField {
    node: NodeId,
    count: usize,
    yaw: f32,
}

impl ParticleField {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }
}

/// A decorative shape that tumbles and floats around its base position
#[derive(Debug, Clone)]
pub struct FloatingShape {
    pub kind: ShapeKind,
    pub base_position: Vec3,
    /// XYZ Euler angles (radians)
    pub rotation: Vec3,
    /// Euler angles added every frame
    pub rotation_velocity: Vec3,
    pub float_speed: f32,
    pub float_amplitude: f32,
    node: NodeId,
}

impl FloatingShape {
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Vertical offset from the base position at `elapsed_secs`
    pub fn float_offset(&self, elapsed_secs: f32) -> f32 {
        (elapsed_secs * self.float_speed).sin() * self.float_amplitude * FLOAT_STEP
    }
}

/// The page background
pub struct BackgroundScene {
    viewport: Viewport,
    particles: ParticleField,
    shapes: Vec<FloatingShape>,
    grid: NodeId,
}

impl BackgroundScene {
    /// Build the background inside `config.container`, sized to the window.
    ///
    /// Returns `None` when the container does not exist.
    pub fn mount(
        document: &mut dyn Document,
        config: &BackgroundConfig,
        surface: &SurfaceConfig,
    ) -> Option<Self> {
        let camera = PerspectiveCamera::new(BACKGROUND_FOV, 1.0, 0.1, 1000.0);
        let mut viewport = Viewport::mount(
            document,
            &config.container,
            SurfaceSizing::Window,
            surface,
            camera,
        )?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        viewport.add_light(Light::ambient(0xffffff, 0.6));
        viewport.add_light(Light::directional(0x0066ff, 0.8, Vec3::new(10.0, 10.0, 5.0)));
        viewport.add_light(Light::point(0x00d4ff, 0.5, Vec3::new(-10.0, -10.0, -5.0)));

        let particles = create_particles(&mut viewport, config, &mut rng);
        let shapes = create_shapes(&mut viewport, config.shape_count, &mut rng);

        let scene = viewport.scene_mut();
        let grid = scene.add(
            scene.root(),
            "grid",
            NodeKind::Grid(GridHelper::new(GRID_SIZE, GRID_DIVISIONS, 0x0066ff, 0x004499)),
        );
        if let Some(transform) = scene.transform_mut(grid) {
            transform.position.y = GRID_Y;
        }

        viewport.camera_mut().position = CAMERA_BASE;
        viewport.set_continuous(true);

        log::info!(
            "Background ready: {} particles, {} shapes",
            particles.count,
            shapes.len()
        );

        Some(Self {
            viewport,
            particles,
            shapes,
            grid,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn shapes(&self) -> &[FloatingShape] {
        &self.shapes
    }

    pub fn grid(&self) -> NodeId {
        self.grid
    }

    /// Animate one frame and render
    pub fn frame(&mut self, ctx: &FrameContext) {
        let t = ctx.elapsed_secs();
        let t_ms = ctx.elapsed_ms();
        let (camera, scene) = self.viewport.parts_mut();

        self.particles.yaw = advance_angle(self.particles.yaw, PARTICLE_YAW_STEP);
        if let Some(transform) = scene.transform_mut(self.particles.node) {
            transform.rotation = Quat::from_rotation_y(self.particles.yaw);
        }

        for shape in &mut self.shapes {
            shape.rotation = advance_euler(shape.rotation, shape.rotation_velocity);
            let y = shape.base_position.y + shape.float_offset(t);
            if let Some(transform) = scene.transform_mut(shape.node) {
                transform.set_euler(shape.rotation);
                transform.position.y = y;
            }
        }

        camera.position.x = (t_ms * 0.0003).sin() as f32 * 5.0;
        camera.position.y = CAMERA_BASE.y + (t_ms * 0.0004).cos() as f32 * 2.0;
        camera.look_at(Vec3::ZERO);

        self.viewport.render_frame();
    }

    /// Follow a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
    }
}

fn create_particles(viewport: &mut Viewport, config: &BackgroundConfig, rng: &mut StdRng) -> ParticleField {
    let count = config.particle_count;
    let spread = config.particle_spread;
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    for _ in 0..count {
        positions.push(Vec3::new(
            (rng.gen::<f32>() - 0.5) * spread,
            (rng.gen::<f32>() - 0.5) * spread,
            (rng.gen::<f32>() - 0.5) * spread,
        ));
        colors.push(Color::from_hsl(200.0 + rng.gen::<f32>() * 40.0, 1.0, 0.5));
    }

    let material = Material::points(PARTICLE_SIZE)
        .with_vertex_colors(true)
        .with_opacity(PARTICLE_OPACITY)
        .with_blending(Blending::Additive);

    let scene = viewport.scene_mut();
    let node = scene.add(
        scene.root(),
        "particles",
        NodeKind::Points(PointCloud {
            positions,
            colors,
            material,
        }),
    );

    ParticleField {
        node,
        count,
        yaw: 0.0,
    }
}

fn create_shapes(viewport: &mut Viewport, count: usize, rng: &mut StdRng) -> Vec<FloatingShape> {
    let geometries: Vec<Arc<Geometry>> = ShapeKind::ALL
        .iter()
        .map(|kind| Arc::new(Geometry::from_shape(*kind, SHAPE_SIZE)))
        .collect();
    let scene = viewport.scene_mut();
    let mut shapes = Vec::with_capacity(count);

    for i in 0..count {
        let index = rng.gen_range(0..ShapeKind::ALL.len());
        let kind = ShapeKind::ALL[index];

        let material = Material::phong(Color::from_hsl(200.0 + rng.gen::<f32>() * 60.0, 1.0, 0.5))
            .with_wireframe(rng.gen::<f32>() > 0.5)
            .with_opacity(0.3 + rng.gen::<f32>() * 0.3)
            .with_emissive(Color::from_hex(0x0066ff), 0.2);

        let base_position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 50.0,
            (rng.gen::<f32>() - 0.5) * 30.0,
            (rng.gen::<f32>() - 0.5) * 30.0,
        );
        let rotation = Vec3::new(
            rng.gen::<f32>() * PI,
            rng.gen::<f32>() * PI,
            rng.gen::<f32>() * PI,
        );
        let rotation_velocity = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 0.02,
            (rng.gen::<f32>() - 0.5) * 0.02,
            (rng.gen::<f32>() - 0.5) * 0.02,
        );
        let float_speed = rng.gen::<f32>() * 0.5 + 0.5;
        let float_amplitude = rng.gen::<f32>() * 2.0 + 1.0;

        let root = scene.root();
        let node = scene.add_mesh(
            root,
            format!("{}-{}", kind.name(), i),
            geometries[index].clone(),
            material,
        );
        if let Some(transform) = scene.transform_mut(node) {
            transform.position = base_position;
            transform.set_euler(rotation);
        }

        shapes.push(FloatingShape {
            kind,
            base_position,
            rotation,
            rotation_velocity,
            float_speed,
            float_amplitude,
            node,
        });
    }

    shapes
}
