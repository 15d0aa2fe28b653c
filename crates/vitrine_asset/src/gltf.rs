//! glTF/GLB loader
//!
//! Supports:
//! - glTF 2.0 (.gltf + .bin) and GLB (.glb) formats
//! - PBR metallic-roughness materials (factors and base color texture index)
//! - Triangle primitives with positions and indices
//! - Scene hierarchy (nodes, transforms)
//!
//! Animations, skins and morph targets are ignored.

use crate::error::{LoadError, LoadResult};
use crate::loader::SceneLoader;
use crate::model::{ModelMesh, ModelNode, ModelPrimitive, ModelScene};
use glam::{Quat, Vec3};
use std::path::Path;
use std::sync::Arc;
use vitrine_render::{Color, Geometry, Material, Transform};

/// Loader for glTF/GLB files
#[derive(Clone, Copy, Debug, Default)]
pub struct GltfLoader;

impl GltfLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load from file bytes (GLB or self-contained glTF JSON)
    pub fn load_slice(&self, data: &[u8]) -> LoadResult<ModelScene> {
        let (document, buffers, _images) = gltf::import_slice(data)?;
        Self::process(&document, &buffers)
    }

    fn process(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> LoadResult<ModelScene> {
        let materials = Self::load_materials(document);
        let meshes = Self::load_meshes(document, buffers)?;
        let nodes = Self::load_nodes(document);

        let roots = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .map(|s| s.nodes().map(|n| n.index()).collect())
            .unwrap_or_default();

        Ok(ModelScene {
            nodes,
            roots,
            meshes,
            materials,
        })
    }

    fn load_materials(document: &gltf::Document) -> Vec<Material> {
        document
            .materials()
            .map(|mat| {
                let pbr = mat.pbr_metallic_roughness();
                let [r, g, b, a] = pbr.base_color_factor();
                let [er, eg, eb] = mat.emissive_factor();

                let mut material = Material::standard(
                    Color::new(r, g, b),
                    pbr.metallic_factor(),
                    pbr.roughness_factor(),
                )
                .with_emissive(Color::new(er, eg, eb), 1.0)
                .with_double_sided(mat.double_sided());

                material.opacity = a;
                material.transparent = mat.alpha_mode() == gltf::material::AlphaMode::Blend;
                material.base_color_texture = pbr
                    .base_color_texture()
                    .map(|t| t.texture().source().index());
                material
            })
            .collect()
    }

    fn load_meshes(
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
    ) -> LoadResult<Vec<ModelMesh>> {
        let mut meshes = Vec::new();

        for mesh in document.meshes() {
            let mut primitives = Vec::new();

            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::debug!(
                        "Skipping {:?} primitive in mesh '{}'",
                        primitive.mode(),
                        mesh.name().unwrap_or("")
                    );
                    continue;
                }

                let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));

                let positions: Vec<Vec3> = reader
                    .read_positions()
                    .ok_or_else(|| LoadError::Parse("mesh primitive missing positions".to_string()))?
                    .map(Vec3::from_array)
                    .collect();

                let indices: Vec<u32> = reader
                    .read_indices()
                    .map(|i| i.into_u32().collect())
                    .unwrap_or_else(|| (0..positions.len() as u32).collect());

                primitives.push(ModelPrimitive {
                    geometry: Arc::new(Geometry::new(positions, indices)),
                    material: primitive.material().index(),
                });
            }

            meshes.push(ModelMesh {
                name: mesh.name().unwrap_or("").to_string(),
                primitives,
            });
        }

        Ok(meshes)
    }

    fn load_nodes(document: &gltf::Document) -> Vec<ModelNode> {
        document
            .nodes()
            .map(|node| {
                let (translation, rotation, scale) = node.transform().decomposed();
                ModelNode {
                    name: node.name().unwrap_or("").to_string(),
                    transform: Transform {
                        position: Vec3::from_array(translation),
                        rotation: Quat::from_array(rotation),
                        scale: Vec3::from_array(scale),
                    },
                    mesh: node.mesh().map(|m| m.index()),
                    children: node.children().map(|c| c.index()).collect(),
                }
            })
            .collect()
    }
}

impl SceneLoader for GltfLoader {
    fn extensions(&self) -> &[&str] {
        &["glb", "gltf"]
    }

    fn load(&self, path: &Path) -> LoadResult<ModelScene> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.display().to_string()));
        }
        let (document, buffers, _images) = gltf::import(path)?;
        let model = Self::process(&document, &buffers)?;
        log::debug!(
            "Parsed {}: {} nodes, {} primitives, {} vertices",
            path.display(),
            model.nodes.len(),
            model.mesh_count(),
            model.vertex_count()
        );
        Ok(model)
    }
}
