//! Loaded model hierarchies

use glam::Mat4;
use std::sync::Arc;
use vitrine_render::{Aabb, Geometry, Material, NodeId, SceneGraph, Transform};

/// A mesh primitive with its material index
#[derive(Clone, Debug)]
pub struct ModelPrimitive {
    pub geometry: Arc<Geometry>,
    /// Index into [`ModelScene::materials`], or None for the default material
    pub material: Option<usize>,
}

/// A mesh containing one or more primitives
#[derive(Clone, Debug, Default)]
pub struct ModelMesh {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

/// A node with a local transform
#[derive(Clone, Debug)]
pub struct ModelNode {
    pub name: String,
    pub transform: Transform,
    /// Index into [`ModelScene::meshes`], or None
    pub mesh: Option<usize>,
    /// Child node indices
    pub children: Vec<usize>,
}

/// Complete model hierarchy produced by a scene loader
#[derive(Clone, Debug, Default)]
pub struct ModelScene {
    pub nodes: Vec<ModelNode>,
    /// Root node indices of the default scene
    pub roots: Vec<usize>,
    pub meshes: Vec<ModelMesh>,
    pub materials: Vec<Material>,
}

impl ModelScene {
    /// Single-node scene around one geometry
    pub fn from_geometry(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        let name = name.into();
        Self {
            nodes: vec![ModelNode {
                name: name.clone(),
                transform: Transform::IDENTITY,
                mesh: Some(0),
                children: Vec::new(),
            }],
            roots: vec![0],
            meshes: vec![ModelMesh {
                name,
                primitives: vec![ModelPrimitive {
                    geometry: Arc::new(geometry),
                    material: Some(0),
                }],
            }],
            materials: vec![material],
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitives.len()).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes
            .iter()
            .flat_map(|m| m.primitives.iter())
            .map(|p| p.geometry.vertex_count())
            .sum()
    }

    /// Bounds of the default scene in model space
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        self.walk(|index, world| {
            if let Some(mesh) = self.nodes[index].mesh.and_then(|m| self.meshes.get(m)) {
                for primitive in &mesh.primitives {
                    bounds = bounds.union(&primitive.geometry.bounds().transform(&world));
                }
            }
        });
        bounds
    }

    /// Copy the hierarchy into `graph` under a new group named `name`.
    ///
    /// Every primitive becomes its own mesh node below the node that
    /// references it. Returns the id of the new group.
    pub fn instantiate(&self, graph: &mut SceneGraph, parent: NodeId, name: &str) -> NodeId {
        let root = graph.add_group(parent, name);
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, NodeId)> = self.roots.iter().rev().map(|&r| (r, root)).collect();

        while let Some((index, parent_id)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                log::warn!("Model node {} referenced twice, skipping", index);
                continue;
            }

            let id = graph.add_group(parent_id, node.name.clone());
            if let Some(transform) = graph.transform_mut(id) {
                *transform = node.transform;
            }

            if let Some(mesh) = node.mesh.and_then(|m| self.meshes.get(m)) {
                for (i, primitive) in mesh.primitives.iter().enumerate() {
                    let material = primitive
                        .material
                        .and_then(|m| self.materials.get(m))
                        .cloned()
                        .unwrap_or_default();
                    graph.add_mesh(
                        id,
                        format!("{}#{}", mesh.name, i),
                        primitive.geometry.clone(),
                        material,
                    );
                }
            }

            stack.extend(node.children.iter().rev().map(|&c| (c, id)));
        }

        root
    }

    /// Visit every reachable node with its model-space matrix
    fn walk(&self, mut visit: impl FnMut(usize, Mat4)) {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, Mat4)> = self.roots.iter().map(|&r| (r, Mat4::IDENTITY)).collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            let world = parent * node.transform.to_matrix();
            visit(index, world);
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }
    }
}
