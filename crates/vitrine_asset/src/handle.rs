//! Model handles
//!
//! A [`ModelHandle`] is created when a model is requested and is shared
//! between the requester and the asset server. Its state moves out of
//! [`LoadState::Pending`] exactly once, when the completion is delivered by
//! [`AssetServer::poll`](crate::server::AssetServer::poll).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Unique identifier for a load request
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(pub u64);

impl AssetId {
    pub const fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Load state for a model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LoadState {
    /// Requested, completion not yet delivered
    Pending = 0,
    /// Model delivered
    Loaded = 1,
    /// Load failed
    Failed = 2,
}

impl From<u8> for LoadState {
    fn from(v: u8) -> Self {
        match v {
            1 => Self::Loaded,
            2 => Self::Failed,
            _ => Self::Pending,
        }
    }
}

struct HandleData {
    id: AssetId,
    path: PathBuf,
    state: AtomicU8,
}

/// Shared handle to a requested model
#[derive(Clone)]
pub struct ModelHandle {
    data: Arc<HandleData>,
}

impl ModelHandle {
    pub(crate) fn new(id: AssetId, path: impl Into<PathBuf>) -> Self {
        Self {
            data: Arc::new(HandleData {
                id,
                path: path.into(),
                state: AtomicU8::new(LoadState::Pending as u8),
            }),
        }
    }

    pub fn id(&self) -> AssetId {
        self.data.id
    }

    /// Path as requested (relative to the asset directory)
    pub fn path(&self) -> &Path {
        &self.data.path
    }

    pub fn state(&self) -> LoadState {
        LoadState::from(self.data.state.load(Ordering::Acquire))
    }

    pub fn is_pending(&self) -> bool {
        self.state() == LoadState::Pending
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == LoadState::Loaded
    }

    pub fn is_failed(&self) -> bool {
        self.state() == LoadState::Failed
    }

    /// Move out of `Pending`. Returns false if the handle was already resolved.
    pub(crate) fn resolve(&self, state: LoadState) -> bool {
        self.data
            .state
            .compare_exchange(
                LoadState::Pending as u8,
                state as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

impl PartialEq for ModelHandle {
    fn eq(&self, other: &Self) -> bool {
        self.data.id == other.data.id
    }
}

impl Eq for ModelHandle {}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("id", &self.data.id)
            .field("path", &self.data.path)
            .field("state", &self.state())
            .finish()
    }
}
