//! Scene loaders
//!
//! A [`SceneLoader`] turns a file path into a [`ModelScene`]. Loaders are
//! called from worker threads, so they must be `Send + Sync`.

use crate::error::{LoadError, LoadResult};
use crate::model::ModelScene;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Trait for model loaders
pub trait SceneLoader: Send + Sync {
    /// File extensions this loader handles (lowercase, without the dot)
    fn extensions(&self) -> &[&str];

    /// Load a model from a resolved path
    fn load(&self, path: &Path) -> LoadResult<ModelScene>;

    /// Check whether the loader handles this path's extension
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions().iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}

/// Loader serving models registered in memory
///
/// Paths are matched exactly as resolved by the asset server. Anything not
/// registered is reported as [`LoadError::NotFound`].
#[derive(Default)]
pub struct MemoryLoader {
    models: RwLock<HashMap<PathBuf, ModelScene>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, model: ModelScene) {
        self.models.write().insert(path.into(), model);
    }

    pub fn with(self, path: impl Into<PathBuf>, model: ModelScene) -> Self {
        self.insert(path, model);
        self
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }
}

impl SceneLoader for MemoryLoader {
    fn extensions(&self) -> &[&str] {
        &["glb", "gltf"]
    }

    fn load(&self, path: &Path) -> LoadResult<ModelScene> {
        self.models
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.display().to_string()))
    }
}
