//! Integration tests for glTF loading
//!
//! Fixtures are written to a temporary directory:
//! - a .gltf + .bin pair
//! - a self-contained .glb
//!
//! Both describe the same box, min (1, 2, 3) max (5, 4, 4), under a node
//! scaled by 2 whose parent is translated by 10 on X.

use approx::assert_relative_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use vitrine_asset::{AssetServer, AssetServerConfig, GltfLoader, LoadError, SceneLoader};
use vitrine_render::SceneGraph;

const BOX_MIN: [f32; 3] = [1.0, 2.0, 3.0];
const BOX_MAX: [f32; 3] = [5.0, 4.0, 4.0];

fn box_buffer() -> Vec<u8> {
    let mut bytes = Vec::new();
    for i in 0..8u32 {
        let corner = [
            if i & 1 == 0 { BOX_MIN[0] } else { BOX_MAX[0] },
            if i & 2 == 0 { BOX_MIN[1] } else { BOX_MAX[1] },
            if i & 4 == 0 { BOX_MIN[2] } else { BOX_MAX[2] },
        ];
        for c in corner {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
    }
    let indices: [u16; 36] = [
        0, 1, 3, 0, 3, 2, 4, 6, 7, 4, 7, 5, 0, 4, 5, 0, 5, 1, 2, 3, 7, 2, 7, 6, 0, 2, 6, 0, 6, 4,
        1, 5, 7, 1, 7, 3,
    ];
    for i in indices {
        bytes.extend_from_slice(&i.to_le_bytes());
    }
    bytes
}

fn box_document(buffer_uri: Option<&str>, byte_length: usize) -> serde_json::Value {
    let mut buffer = json!({ "byteLength": byte_length });
    if let Some(uri) = buffer_uri {
        buffer["uri"] = json!(uri);
    }
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "root", "children": [1], "translation": [10.0, 0.0, 0.0] },
            { "name": "body", "mesh": 0, "scale": [2.0, 2.0, 2.0] }
        ],
        "meshes": [{
            "name": "box",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{
            "pbrMetallicRoughness": {
                "baseColorFactor": [1.0, 0.0, 0.0, 1.0],
                "metallicFactor": 0.2,
                "roughnessFactor": 0.7
            },
            "doubleSided": true
        }],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 8, "type": "VEC3",
                "min": BOX_MIN, "max": BOX_MAX
            },
            { "bufferView": 1, "componentType": 5123, "count": 36, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 96, "target": 34962 },
            { "buffer": 0, "byteOffset": 96, "byteLength": 72, "target": 34963 }
        ],
        "buffers": [buffer]
    })
}

fn write_gltf(dir: &Path) -> std::path::PathBuf {
    let bin = box_buffer();
    fs::write(dir.join("box.bin"), &bin).unwrap();
    let doc = box_document(Some("box.bin"), bin.len());
    let path = dir.join("box.gltf");
    fs::write(&path, serde_json::to_vec_pretty(&doc).unwrap()).unwrap();
    path
}

fn glb_bytes() -> Vec<u8> {
    let mut bin = box_buffer();
    let mut json = serde_json::to_vec(&box_document(None, bin.len())).unwrap();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

#[test]
fn test_gltf_with_external_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_gltf(dir.path());

    let model = GltfLoader::new().load(&path).unwrap();
    assert_eq!(model.nodes.len(), 2);
    assert_eq!(model.roots, vec![0]);
    assert_eq!(model.mesh_count(), 1);
    assert_eq!(model.vertex_count(), 8);

    let bounds = model.bounds();
    assert_relative_eq!(bounds.min.x, 12.0, epsilon = 1e-5);
    assert_relative_eq!(bounds.max.x, 20.0, epsilon = 1e-5);
    assert_relative_eq!(bounds.min.y, 4.0, epsilon = 1e-5);
    assert_relative_eq!(bounds.max.z, 8.0, epsilon = 1e-5);
    assert_relative_eq!(bounds.max_extent(), 8.0, epsilon = 1e-5);

    let material = &model.materials[0];
    assert_relative_eq!(material.metalness, 0.2);
    assert_relative_eq!(material.roughness, 0.7);
    assert!(material.double_sided);
    assert_eq!(material.color.to_hex(), 0xff0000);
}

#[test]
fn test_glb_from_file_and_slice() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = glb_bytes();
    let path = dir.path().join("box.glb");
    fs::write(&path, &bytes).unwrap();

    let from_file = GltfLoader::new().load(&path).unwrap();
    let from_slice = GltfLoader::new().load_slice(&bytes).unwrap();
    assert_eq!(from_file.bounds(), from_slice.bounds());

    let mut graph = SceneGraph::new();
    let parent = graph.root();
    let root = from_file.instantiate(&mut graph, parent, "box");
    let world = graph.world_bounds(root);
    assert_relative_eq!(world.max_extent(), 8.0, epsilon = 1e-5);
}

#[test]
fn test_truncated_glb_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = glb_bytes();
    let path = dir.path().join("broken.glb");
    fs::write(&path, &bytes[..40]).unwrap();

    let err = GltfLoader::new().load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)), "{err}");
}

#[test]
fn test_server_with_workers() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("models")).unwrap();
    fs::write(dir.path().join("models/box.glb"), glb_bytes()).unwrap();

    let server = AssetServer::new(
        AssetServerConfig {
            asset_dir: dir.path().to_path_buf(),
            worker_threads: 2,
        },
        Arc::new(GltfLoader::new()),
    );
    assert_eq!(server.worker_count(), 2);

    let good = server.load("models/box.glb");
    let missing = server.load("models/missing.glb");

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut delivered = Vec::new();
    while delivered.len() < 2 && Instant::now() < deadline {
        delivered.extend(server.poll());
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(delivered.len(), 2);
    assert!(good.is_loaded());
    assert!(missing.is_failed());
    assert_eq!(server.pending_count(), 0);

    let missing_result = delivered
        .iter()
        .find(|c| c.handle == missing)
        .map(|c| c.result.as_ref().err().cloned());
    assert!(matches!(missing_result, Some(Some(LoadError::NotFound(_)))));

    // Nothing is delivered twice
    std::thread::sleep(Duration::from_millis(20));
    assert!(server.poll().is_empty());
}
