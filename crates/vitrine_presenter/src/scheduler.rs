//! Frame scheduler
//!
//! Continuous animation loops, one per animated viewport. Every registered
//! loop runs once per [`FrameScheduler::tick`] against a shared state value.
//!
//! - Registration needs `&mut` access, so loops are only added between ticks
//!   and first run on the next one.
//! - A loop's cancellation flag is checked at the top of each iteration; a
//!   cancelled loop is dropped without running again.

use crate::frame::FrameContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Loop body
pub type FrameCallback<T> = Box<dyn FnMut(&mut T, &FrameContext)>;

/// Unique loop identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopId(u64);

impl LoopId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Handle used to stop a running loop
#[derive(Debug, Clone)]
pub struct LoopHandle {
    id: LoopId,
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn id(&self) -> LoopId {
        self.id
    }

    /// Stop the loop before its next iteration
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

struct LoopEntry<T> {
    id: LoopId,
    name: String,
    cancelled: Arc<AtomicBool>,
    callback: FrameCallback<T>,
}

/// Runs continuous loops once per tick
pub struct FrameScheduler<T> {
    loops: Vec<LoopEntry<T>>,
    next_id: u64,
    frame_number: u64,
    last_elapsed: Duration,
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self {
            loops: Vec::new(),
            next_id: 0,
            frame_number: 0,
            last_elapsed: Duration::ZERO,
        }
    }

    /// Register a loop; it first runs on the next tick
    pub fn register<F>(&mut self, name: impl Into<String>, callback: F) -> LoopHandle
    where
        F: FnMut(&mut T, &FrameContext) + 'static,
    {
        self.next_id += 1;
        let id = LoopId(self.next_id);
        let cancelled = Arc::new(AtomicBool::new(false));
        let name = name.into();
        log::debug!("Registered frame loop '{}' ({:?})", name, id);
        self.loops.push(LoopEntry {
            id,
            name,
            cancelled: cancelled.clone(),
            callback: Box::new(callback),
        });
        LoopHandle { id, cancelled }
    }

    /// Run every live loop once.
    ///
    /// `elapsed` is the wall-clock time since the page started. Returns the
    /// number of loops that ran.
    pub fn tick(&mut self, state: &mut T, elapsed: Duration) -> usize {
        self.frame_number += 1;
        let ctx = FrameContext::new(
            self.frame_number,
            elapsed,
            elapsed.saturating_sub(self.last_elapsed),
        );
        self.last_elapsed = elapsed;

        let mut ran = 0;
        self.loops.retain_mut(|entry| {
            if entry.cancelled.load(Ordering::Acquire) {
                log::debug!("Frame loop '{}' ({:?}) cancelled", entry.name, entry.id);
                return false;
            }
            (entry.callback)(state, &ctx);
            ran += 1;
            true
        });
        ran
    }

    /// Cancel every loop, including ones not started yet
    pub fn cancel_all(&mut self) {
        for entry in &self.loops {
            entry.cancelled.store(true, Ordering::Release);
        }
    }

    /// Live loops, including ones waiting for their first tick
    pub fn len(&self) -> usize {
        self.loops
            .iter()
            .filter(|e| !e.cancelled.load(Ordering::Acquire))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Names of the registered loops, in run order
    pub fn loop_names(&self) -> Vec<&str> {
        self.loops.iter().map(|e| e.name.as_str()).collect()
    }
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
