//! # vitrine_render - Scene Graph and Camera Primitives
//!
//! Backend-agnostic scene description shared by every Vitrine viewport:
//! - Arena scene graph with world transforms and world bounds
//! - Perspective camera and orbit controls
//! - Light rigs (ambient, directional, point)
//! - Primitive geometry factory for decorative shapes
//! - Materials, colors and bounding boxes
//!
//! Nothing in this crate talks to a GPU. A render surface (see
//! `vitrine_presenter`) consumes a [`SceneGraph`] together with a
//! [`PerspectiveCamera`] and draws them.
//!
//! ## Example
//!
//! ```ignore
//! use vitrine_render::prelude::*;
//!
//! let mut scene = SceneGraph::new();
//! let shape = Geometry::from_shape(ShapeKind::Icosahedron, 2.0);
//! let id = scene.add_mesh(scene.root(), "shape", shape, Material::phong(Color::from_hex(0x0066ff)));
//!
//! let mut camera = PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 1000.0);
//! camera.position = glam::Vec3::new(0.0, 5.0, 30.0);
//! camera.look_at(glam::Vec3::ZERO);
//! ```

pub mod bounds;
pub mod camera;
pub mod color;
pub mod controls;
pub mod geometry;
pub mod light;
pub mod material;
pub mod scene;

pub use bounds::Aabb;
pub use camera::PerspectiveCamera;
pub use color::Color;
pub use controls::{OrbitControls, OrbitInput};
pub use geometry::{Geometry, ShapeKind};
pub use light::{Light, LightRig};
pub use material::{Blending, Material, MaterialKind};
pub use scene::{
    advance_angle, advance_euler, wrap_angle, GridHelper, Mesh, Node, NodeId, NodeKind, PointCloud,
    SceneGraph, Transform,
};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::camera::PerspectiveCamera;
    pub use crate::color::Color;
    pub use crate::controls::{OrbitControls, OrbitInput};
    pub use crate::geometry::{Geometry, ShapeKind};
    pub use crate::light::{Light, LightRig};
    pub use crate::material::{Blending, Material, MaterialKind};
    pub use crate::scene::{NodeId, NodeKind, SceneGraph, Transform};
}
