//! Arena scene graph
//!
//! Nodes live in a flat vector and reference each other by [`NodeId`]. The
//! root is always node 0. Nodes are never removed; hiding a subtree is done
//! through [`Node::visible`].

use crate::bounds::Aabb;
use crate::color::Color;
use crate::geometry::Geometry;
use crate::light::Light;
use crate::material::Material;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f32::consts::TAU;
use std::sync::Arc;

/// Index of a node inside a [`SceneGraph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Position, rotation and scale relative to the parent node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Set rotation from XYZ Euler angles in radians
    pub fn set_euler(&mut self, euler: Vec3) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Wrap an angle into `[0, 2π)`
#[inline]
pub fn wrap_angle(radians: f32) -> f32 {
    radians.rem_euclid(TAU)
}

/// Add `step` to a wrapped angle and wrap the result.
///
/// The input is wrapped first so an angle that has grown large still moves by
/// the full step.
#[inline]
pub fn advance_angle(radians: f32, step: f32) -> f32 {
    wrap_angle(wrap_angle(radians) + step)
}

/// [`advance_angle`] applied to each Euler component
#[inline]
pub fn advance_euler(euler: Vec3, step: Vec3) -> Vec3 {
    Vec3::new(
        advance_angle(euler.x, step.x),
        advance_angle(euler.y, step.y),
        advance_angle(euler.z, step.z),
    )
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Triangle mesh with a single material
#[derive(Clone, Debug)]
pub struct Mesh {
    pub geometry: Arc<Geometry>,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: impl Into<Arc<Geometry>>, material: Material) -> Self {
        Self {
            geometry: geometry.into(),
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

/// Unconnected points with optional per-vertex colors
#[derive(Clone, Debug)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Color>,
    pub material: Material,
}

impl PointCloud {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }
}

/// Square line grid on the XZ plane
#[derive(Clone, Debug, PartialEq)]
pub struct GridHelper {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
}

impl GridHelper {
    pub fn new(size: f32, divisions: u32, center_color: u32, line_color: u32) -> Self {
        Self {
            size,
            divisions,
            center_color: Color::from_hex(center_color),
            line_color: Color::from_hex(line_color),
        }
    }

    /// Number of lines drawn along each axis
    pub fn line_count(&self) -> u32 {
        self.divisions + 1
    }

    pub fn bounds(&self) -> Aabb {
        let h = self.size * 0.5;
        Aabb::new(Vec3::new(-h, 0.0, -h), Vec3::new(h, 0.0, h))
    }
}

/// What a node draws (or emits)
#[derive(Clone, Debug)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Points(PointCloud),
    Grid(GridHelper),
    Light(Light),
    /// Marker mirroring a viewport's camera
    Camera,
}

impl NodeKind {
    /// Local-space bounds of drawable content
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Self::Mesh(mesh) => mesh.geometry.bounds(),
            Self::Points(points) => points.bounds(),
            Self::Grid(grid) => grid.bounds(),
            Self::Group | Self::Light(_) | Self::Camera => Aabb::EMPTY,
        }
    }
}

/// A node in the scene graph
#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// Hierarchical scene owned by one viewport
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "root".to_string(),
                kind: NodeKind::Group,
                transform: Transform::IDENTITY,
                visible: true,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Add a node under `parent`. An unknown parent attaches to the root.
    pub fn add(&mut self, parent: NodeId, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let parent = if parent.index() < self.nodes.len() {
            parent
        } else {
            self.root()
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name: name.into(),
            kind,
            transform: Transform::IDENTITY,
            visible: true,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.add(parent, name, NodeKind::Group)
    }

    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        geometry: impl Into<Arc<Geometry>>,
        material: Material,
    ) -> NodeId {
        self.add(parent, name, NodeKind::Mesh(Mesh::new(geometry, material)))
    }

    pub fn add_light(&mut self, parent: NodeId, light: Light) -> NodeId {
        let id = self.add(parent, "light", NodeKind::Light(light));
        if let Some(position) = light.position() {
            self.nodes[id.index()].transform.position = position;
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.node(id).map(|n| &n.transform)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).map(|n| &mut n.transform)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// First node with the given name, in insertion order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(|i| NodeId(i as u32))
    }

    /// All nodes below `id` (not including `id`), depth first
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Local-to-world matrix of a node
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut matrix = node.transform.to_matrix();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            matrix = node.transform.to_matrix() * matrix;
        }
        Some(matrix)
    }

    /// World-space bounds of the subtree rooted at `id`
    pub fn world_bounds(&self, id: NodeId) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for node_id in std::iter::once(id).chain(self.descendants(id)) {
            let Some(node) = self.node(node_id) else {
                continue;
            };
            let local = node.kind.local_bounds();
            if local.is_empty() {
                continue;
            }
            if let Some(world) = self.world_matrix(node_id) {
                bounds = bounds.union(&local.transform(&world));
            }
        }
        bounds
    }

    /// Nodes that are visible along their whole ancestor chain
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hierarchy() {
        let mut scene = SceneGraph::new();
        let group = scene.add_group(scene.root(), "group");
        let a = scene.add_mesh(group, "a", Geometry::cuboid(1.0, 1.0, 1.0), Material::default());
        let b = scene.add_group(a, "b");

        assert_eq!(scene.children(scene.root()), &[group]);
        assert_eq!(scene.descendants(scene.root()), vec![group, a, b]);
        assert_eq!(scene.node(b).and_then(|n| n.parent()), Some(a));
        assert_eq!(scene.find("a"), Some(a));
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let mut scene = SceneGraph::new();
        let parent = scene.add_group(scene.root(), "parent");
        let child = scene.add_group(parent, "child");

        *scene.transform_mut(parent).unwrap() =
            Transform::from_position(Vec3::new(1.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0));
        *scene.transform_mut(child).unwrap() = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));

        let p = scene.world_matrix(child).unwrap().transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn test_world_bounds() {
        let mut scene = SceneGraph::new();
        let group = scene.add_group(scene.root(), "group");
        let mesh = scene.add_mesh(group, "box", Geometry::cuboid(2.0, 2.0, 2.0), Material::default());
        scene.transform_mut(mesh).unwrap().position = Vec3::new(5.0, 0.0, 0.0);
        scene.transform_mut(group).unwrap().scale = Vec3::splat(0.5);

        let bounds = scene.world_bounds(group);
        assert_relative_eq!(bounds.min.x, 2.0);
        assert_relative_eq!(bounds.max.x, 3.0);
        assert_relative_eq!(bounds.max_extent(), 1.0);
    }

    #[test]
    fn test_empty_group_has_empty_bounds() {
        let mut scene = SceneGraph::new();
        let group = scene.add_group(scene.root(), "group");
        assert!(scene.world_bounds(group).is_empty());
    }

    #[test]
    fn test_hidden_subtree_skipped() {
        let mut scene = SceneGraph::new();
        let group = scene.add_group(scene.root(), "group");
        let child = scene.add_group(group, "child");
        scene.node_mut(group).unwrap().visible = false;

        let visible = scene.visible_nodes();
        assert!(!visible.contains(&group));
        assert!(!visible.contains(&child));
    }

    #[test]
    fn test_light_takes_position() {
        let mut scene = SceneGraph::new();
        let light = scene.add_light(scene.root(), Light::point(0x00d4ff, 0.5, Vec3::new(-10.0, -10.0, -5.0)));
        assert_eq!(scene.transform(light).unwrap().position, Vec3::new(-10.0, -10.0, -5.0));
    }
}
