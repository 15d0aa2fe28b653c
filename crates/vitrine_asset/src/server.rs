//! Asset Server - asynchronous model loading
//!
//! Requests are queued with [`AssetServer::load`], which returns a pending
//! [`ModelHandle`] immediately. Loads run on worker threads (or, with zero
//! workers, on the caller's thread during [`AssetServer::poll`]). Results are
//! only handed back from `poll`, so callers see completions on their own
//! thread, once per request.

use crate::error::LoadError;
use crate::handle::{AssetId, LoadState, ModelHandle};
use crate::loader::SceneLoader;
use crate::model::ModelScene;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Asset server configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetServerConfig {
    /// Base directory that request paths are resolved against
    pub asset_dir: PathBuf,
    /// Background load threads; 0 runs loads inside `poll`
    pub worker_threads: usize,
}

impl Default for AssetServerConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("."),
            worker_threads: 2,
        }
    }
}

/// Outcome of one load request
#[derive(Debug)]
pub struct Completion {
    pub handle: ModelHandle,
    pub result: Result<Arc<ModelScene>, LoadError>,
    /// Time spent inside the loader
    pub elapsed: Duration,
}

struct Job {
    handle: ModelHandle,
    resolved: PathBuf,
}

/// The main asset server
pub struct AssetServer {
    config: AssetServerConfig,
    loader: Arc<dyn SceneLoader>,
    next_id: AtomicU64,
    in_flight: AtomicUsize,
    job_tx: Option<Sender<Job>>,
    done_tx: Sender<Completion>,
    done_rx: Receiver<Completion>,
    deferred: Mutex<Vec<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl AssetServer {
    /// Create a server and spawn its workers
    pub fn new(config: AssetServerConfig, loader: Arc<dyn SceneLoader>) -> Self {
        let (done_tx, done_rx) = crossbeam_channel::unbounded();
        let mut workers = Vec::new();
        let mut job_tx = None;

        if config.worker_threads > 0 {
            let (tx, rx) = crossbeam_channel::unbounded::<Job>();
            for i in 0..config.worker_threads {
                let rx = rx.clone();
                let done = done_tx.clone();
                let loader = loader.clone();
                let spawned = std::thread::Builder::new()
                    .name(format!("vitrine-asset-{}", i))
                    .spawn(move || {
                        for job in rx.iter() {
                            let completion = run_job(loader.as_ref(), job);
                            if done.send(completion).is_err() {
                                break;
                            }
                        }
                    });
                match spawned {
                    Ok(worker) => workers.push(worker),
                    Err(e) => log::warn!("Failed to spawn asset worker {}: {}", i, e),
                }
            }
            if workers.is_empty() {
                log::warn!("No asset workers running, loading on the caller's thread");
            } else {
                job_tx = Some(tx);
            }
        }

        log::debug!(
            "Asset server ready: dir={}, workers={}",
            config.asset_dir.display(),
            workers.len()
        );

        Self {
            config,
            loader,
            next_id: AtomicU64::new(1),
            in_flight: AtomicUsize::new(0),
            job_tx,
            done_tx,
            done_rx,
            deferred: Mutex::new(Vec::new()),
            workers,
        }
    }

    pub fn config(&self) -> &AssetServerConfig {
        &self.config
    }

    /// Resolve a request path against the asset directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.asset_dir.join(path)
        }
    }

    /// Request a model. Every call creates a fresh handle.
    pub fn load(&self, path: impl AsRef<Path>) -> ModelHandle {
        let path = path.as_ref();
        let id = AssetId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let handle = ModelHandle::new(id, path);
        let job = Job {
            handle: handle.clone(),
            resolved: self.resolve(path),
        };
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        log::debug!("Requested {} as {}", path.display(), id);

        match &self.job_tx {
            Some(tx) => {
                if let Err(err) = tx.send(job) {
                    // Every worker is gone; report the request as lost
                    let job = err.into_inner();
                    let _ = self.done_tx.send(Completion {
                        result: Err(LoadError::WorkerLost(job.resolved.display().to_string())),
                        handle: job.handle,
                        elapsed: Duration::ZERO,
                    });
                }
            }
            None => self.deferred.lock().push(job),
        }

        handle
    }

    /// Deliver finished loads.
    ///
    /// Each returned completion has already moved its handle out of
    /// `Pending`. Call from the thread that owns the requesters.
    pub fn poll(&self) -> Vec<Completion> {
        let deferred: Vec<Job> = std::mem::take(&mut *self.deferred.lock());
        for job in deferred {
            let completion = run_job(self.loader.as_ref(), job);
            let _ = self.done_tx.send(completion);
        }

        let mut delivered = Vec::new();
        for completion in self.done_rx.try_iter() {
            let state = if completion.result.is_ok() {
                LoadState::Loaded
            } else {
                LoadState::Failed
            };
            if !completion.handle.resolve(state) {
                log::warn!("Dropping duplicate completion for {}", completion.handle.id());
                continue;
            }
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            delivered.push(completion);
        }
        delivered
    }

    /// Requests whose completion has not been delivered yet
    pub fn pending_count(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for AssetServer {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loops
        self.job_tx = None;
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn run_job(loader: &dyn SceneLoader, job: Job) -> Completion {
    let start = Instant::now();
    let result = if !loader.supports(&job.resolved) {
        Err(LoadError::Unsupported(job.resolved.display().to_string()))
    } else {
        match panic::catch_unwind(AssertUnwindSafe(|| loader.load(&job.resolved))) {
            Ok(result) => result.map(Arc::new),
            Err(_) => Err(LoadError::WorkerLost(format!(
                "loader panicked on {}",
                job.resolved.display()
            ))),
        }
    };
    Completion {
        handle: job.handle,
        result,
        elapsed: start.elapsed(),
    }
}
