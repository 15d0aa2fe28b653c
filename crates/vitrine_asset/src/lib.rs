//! # vitrine_asset - Model Loading
//!
//! Turns model paths into scene hierarchies without blocking the page:
//! - [`SceneLoader`] trait with a glTF/GLB implementation ([`GltfLoader`])
//! - [`AssetServer`] running loads on worker threads
//! - [`ModelHandle`] tracking `Pending -> Loaded | Failed`
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vitrine_asset::{AssetServer, AssetServerConfig, GltfLoader};
//!
//! let server = AssetServer::new(AssetServerConfig::default(), Arc::new(GltfLoader::new()));
//! let handle = server.load("models/ROBOT1.glb");
//!
//! // Later, once per frame on the page thread
//! for completion in server.poll() {
//!     match completion.result {
//!         Ok(model) => log::info!("{} ready", completion.handle.path().display()),
//!         Err(e) => log::error!("{}", e),
//!     }
//! }
//! ```

pub mod error;
pub mod gltf;
pub mod handle;
pub mod loader;
pub mod model;
pub mod server;

pub use crate::gltf::GltfLoader;
pub use error::{LoadError, LoadResult};
pub use handle::{AssetId, LoadState, ModelHandle};
pub use loader::{MemoryLoader, SceneLoader};
pub use model::{ModelMesh, ModelNode, ModelPrimitive, ModelScene};
pub use server::{AssetServer, AssetServerConfig, Completion};
