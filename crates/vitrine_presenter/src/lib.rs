//! # vitrine_presenter
//!
//! Presentation layer for Vitrine pages:
//! - Render surfaces ([`RenderSurface`]) and their configuration
//! - A headless surface that records frame statistics
//! - The [`Document`] boundary with an in-memory implementation
//! - [`Viewport`]: one surface + camera + scene graph in a named container
//! - [`FrameScheduler`]: continuous animation loops with cancellation
//!
//! ## Architecture
//!
//! ```text
//! FrameScheduler ──► loop ──► Viewport::render_frame ──► RenderSurface
//!                                                          ▲
//!                            Document::mount_surface ──────┘
//! ```

pub mod document;
pub mod frame;
pub mod headless;
pub mod scheduler;
pub mod surface;
pub mod timing;
pub mod viewport;

pub use document::{Document, Element, Glyph, MemoryDocument};
pub use frame::FrameContext;
pub use headless::{HeadlessSurface, SurfaceStats, SurfaceStatsHandle};
pub use scheduler::{FrameCallback, FrameScheduler, LoopHandle, LoopId};
pub use surface::{OutputEncoding, RenderSurface, SurfaceConfig, SurfaceError, ToneMapping};
pub use timing::{FrameLimiter, FrameTiming};
pub use viewport::{SurfaceSizing, Viewport};
