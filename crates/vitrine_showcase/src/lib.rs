//! # vitrine_showcase - Page Scenes
//!
//! The scenes a Vitrine page is decorated with:
//! - [`ModelViewer`]: a loaded glTF model, normalized, orbiting and bobbing
//! - [`BackgroundScene`]: particles, floating shapes and a grid behind the page
//! - [`LoaderScene`]: the loading-screen animation
//!
//! Every scene owns exactly one [`vitrine_presenter::Viewport`] and exposes a
//! `frame` method meant to be driven by a frame loop.
//!
//! ## Example
//!
//! ```ignore
//! let viewer = mount_viewer(&mut document, &assets, &ViewerConfig::robot());
//! // ... later, for every completion polled from the asset server
//! viewer.complete(&mut document, &completion);
//! ```

pub mod background;
pub mod loader_scene;
pub mod normalize;
pub mod presenter;

pub use background::{BackgroundConfig, BackgroundScene, FloatingShape, ParticleField};
pub use loader_scene::LoaderScene;
pub use normalize::Normalization;
pub use presenter::{
    mount_viewer, present, IdleMotion, MaterialOverride, ModelViewer, PresentOptions,
    ViewerConfig, ViewerState,
};
