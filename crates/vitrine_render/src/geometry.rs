//! Primitive geometry
//!
//! Decorative shapes are picked from a closed set of primitive kinds. Each kind
//! is a variant of [`ShapeKind`] and [`Geometry::from_shape`] is the single
//! factory that turns a kind into vertex data.

use crate::bounds::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Torus tube radius relative to the ring radius (2.0 ring -> 0.5 tube)
pub const TORUS_TUBE_RATIO: f32 = 0.25;
/// Torus radial segments
pub const TORUS_RADIAL_SEGMENTS: u32 = 8;
/// Torus tubular segments
pub const TORUS_TUBULAR_SEGMENTS: u32 = 20;

/// Primitive shape kinds used for decoration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Icosahedron,
    Octahedron,
    Tetrahedron,
    Dodecahedron,
    Torus,
    Box,
}

impl ShapeKind {
    /// All kinds, in a stable order
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Icosahedron,
        ShapeKind::Octahedron,
        ShapeKind::Tetrahedron,
        ShapeKind::Dodecahedron,
        ShapeKind::Torus,
        ShapeKind::Box,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Icosahedron => "icosahedron",
            Self::Octahedron => "octahedron",
            Self::Tetrahedron => "tetrahedron",
            Self::Dodecahedron => "dodecahedron",
            Self::Torus => "torus",
            Self::Box => "box",
        }
    }
}

/// Indexed triangle geometry
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    bounds: Aabb,
}

impl Geometry {
    /// Create from raw positions and triangle indices
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(positions.iter().copied());
        Self {
            positions,
            indices,
            bounds,
        }
    }

    /// Build the geometry for a shape kind.
    ///
    /// `size` is the circumscribed radius for the polyhedra, the ring radius
    /// for the torus and the edge length for the box.
    pub fn from_shape(kind: ShapeKind, size: f32) -> Self {
        match kind {
            ShapeKind::Icosahedron => Self::icosahedron(size),
            ShapeKind::Octahedron => Self::octahedron(size),
            ShapeKind::Tetrahedron => Self::tetrahedron(size),
            ShapeKind::Dodecahedron => Self::dodecahedron(size),
            ShapeKind::Torus => Self::torus(
                size,
                size * TORUS_TUBE_RATIO,
                TORUS_RADIAL_SEGMENTS,
                TORUS_TUBULAR_SEGMENTS,
            ),
            ShapeKind::Box => Self::cuboid(size, size, size),
        }
    }

    pub fn tetrahedron(radius: f32) -> Self {
        let vertices = [[1.0, 1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [1.0, -1.0, -1.0]];
        let indices = [2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1];
        Self::polyhedron(&vertices, &indices, radius)
    }

    pub fn octahedron(radius: f32) -> Self {
        let vertices = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        let indices = [
            0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2, 1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
        ];
        Self::polyhedron(&vertices, &indices, radius)
    }

    pub fn icosahedron(radius: f32) -> Self {
        let t = (1.0 + 5f32.sqrt()) / 2.0;
        let vertices = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ];
        let indices = [
            0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6,
            7, 1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6,
            7, 9, 8, 1,
        ];
        Self::polyhedron(&vertices, &indices, radius)
    }

    pub fn dodecahedron(radius: f32) -> Self {
        let t = (1.0 + 5f32.sqrt()) / 2.0;
        let r = 1.0 / t;
        let vertices = [
            [-1.0, -1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 1.0],
            [0.0, -r, -t],
            [0.0, -r, t],
            [0.0, r, -t],
            [0.0, r, t],
            [-r, -t, 0.0],
            [-r, t, 0.0],
            [r, -t, 0.0],
            [r, t, 0.0],
            [-t, 0.0, -r],
            [t, 0.0, -r],
            [-t, 0.0, r],
            [t, 0.0, r],
        ];
        let indices = [
            3, 11, 7, 3, 7, 15, 3, 15, 13, 7, 19, 17, 7, 17, 6, 7, 6, 15, 17, 4, 8, 17, 8, 10, 17,
            10, 6, 8, 0, 16, 8, 16, 2, 8, 2, 10, 0, 12, 1, 0, 1, 18, 0, 18, 16, 6, 10, 2, 6, 2, 13,
            6, 13, 15, 2, 16, 18, 2, 18, 3, 2, 3, 13, 18, 1, 9, 18, 9, 11, 18, 11, 3, 4, 14, 12, 4,
            12, 0, 4, 0, 8, 11, 9, 5, 11, 5, 19, 11, 19, 7, 19, 5, 14, 19, 14, 4, 19, 4, 17, 1, 12,
            14, 1, 14, 5, 1, 5, 9,
        ];
        Self::polyhedron(&vertices, &indices, radius)
    }

    /// Torus around the Z axis
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial = radial_segments.max(2);
        let tubular = tubular_segments.max(3);
        let mut positions = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;
                positions.push(Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                ));
            }
        }

        let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
        let row = tubular + 1;
        for j in 1..=radial {
            for i in 1..=tubular {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::new(positions, indices)
    }

    /// Axis-aligned box centered at the origin
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vec3::new(width, height, depth) * 0.5;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let indices = vec![
            4, 5, 6, 4, 6, 7, // +z
            1, 0, 3, 1, 3, 2, // -z
            5, 1, 2, 5, 2, 6, // +x
            0, 4, 7, 0, 7, 3, // -x
            7, 6, 2, 7, 2, 3, // +y
            0, 1, 5, 0, 5, 4, // -y
        ];
        Self::new(positions, indices)
    }

    fn polyhedron(vertices: &[[f32; 3]], indices: &[u32], radius: f32) -> Self {
        let positions = vertices
            .iter()
            .map(|v| Vec3::from_array(*v).normalize() * radius)
            .collect();
        Self::new(positions, indices.to_vec())
    }

    /// Local-space bounds
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
