//! Bounding-box normalization
//!
//! Loaded models come in arbitrary units and origins. Normalization scales a
//! model root uniformly so its largest world-space dimension equals a target
//! size, then translates it so the scaled bounding-box center lands on the
//! world origin.

use glam::Vec3;
use vitrine_render::{Aabb, NodeId, SceneGraph};

/// Scale and offset applied to a model root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Uniform factor applied on top of the root's existing scale
    pub scale: f32,
    /// Root position after normalization
    pub offset: Vec3,
}

impl Normalization {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec3::ZERO,
    };
}

/// Compute the normalization for a model whose world bounds are `bounds` and
/// whose root currently sits at `root_position`.
///
/// Returns `None` for empty or degenerate bounds.
pub fn compute(bounds: &Aabb, root_position: Vec3, target_size: f32) -> Option<Normalization> {
    if bounds.is_empty() {
        return None;
    }
    let extent = bounds.max_extent();
    if !extent.is_finite() || extent <= f32::EPSILON {
        return None;
    }

    let scale = target_size / extent;
    // World points scale about the root's position, so the center moves with them
    let offset = (root_position - bounds.center()) * scale;
    Some(Normalization { scale, offset })
}

/// Normalize the subtree rooted at `root` in place.
///
/// Models without drawable extent are left untouched and `None` is returned.
pub fn normalize_node(graph: &mut SceneGraph, root: NodeId, target_size: f32) -> Option<Normalization> {
    let bounds = graph.world_bounds(root);
    let position = graph.transform(root)?.position;

    let Some(normalization) = compute(&bounds, position, target_size) else {
        log::warn!(
            "Model '{}' has no measurable extent, skipping normalization",
            graph.node(root).map(|n| n.name.as_str()).unwrap_or("?")
        );
        return None;
    };

    let transform = graph.transform_mut(root)?;
    transform.scale *= normalization.scale;
    transform.position = normalization.offset;
    Some(normalization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vitrine_render::{Geometry, Material};

    #[test]
    fn test_compute_scale_and_offset() {
        let bounds = Aabb::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(14.0, 2.0, 1.0));
        let n = compute(&bounds, Vec3::ZERO, 3.0).unwrap();
        assert_relative_eq!(n.scale, 0.75);
        assert_relative_eq!(n.offset.x, -9.0);
        assert_relative_eq!(n.offset.y, -0.75);
        assert_relative_eq!(n.offset.z, -0.375);
    }

    #[test]
    fn test_degenerate_bounds() {
        assert!(compute(&Aabb::EMPTY, Vec3::ZERO, 3.0).is_none());
        let flat = Aabb::new(Vec3::ONE, Vec3::ONE);
        assert!(compute(&flat, Vec3::ZERO, 3.0).is_none());
    }

    #[test]
    fn test_normalize_node_centers_and_scales() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(graph.root(), "model");
        graph.transform_mut(root).unwrap().position = Vec3::new(1.0, -2.0, 0.5);
        graph.add_mesh(root, "body", Geometry::cuboid(4.0, 8.0, 2.0), Material::default());
        let inner = graph.add_mesh(root, "arm", Geometry::cuboid(1.0, 1.0, 1.0), Material::default());
        graph.transform_mut(inner).unwrap().position = Vec3::new(6.0, 0.0, 0.0);

        let n = normalize_node(&mut graph, root, 3.0).unwrap();
        let bounds = graph.world_bounds(root);

        assert_relative_eq!(bounds.max_extent(), 3.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.center().x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.center().y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.center().z, 0.0, epsilon = 1e-4);
        assert_eq!(graph.transform(root).unwrap().position, n.offset);
    }

    #[test]
    fn test_empty_model_untouched() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(graph.root(), "model");
        graph.add_group(root, "empty child");

        assert!(normalize_node(&mut graph, root, 3.0).is_none());
        assert_eq!(graph.transform(root).unwrap().scale, Vec3::ONE);
        assert_eq!(graph.transform(root).unwrap().position, Vec3::ZERO);
    }
}
