//! Real-time page session
//!
//! Builds the portfolio page on an in-memory document and drives it at the
//! configured frame rate until the duration elapses or `running` drops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use vitrine_asset::{AssetServer, GltfLoader};
use vitrine_page::{portfolio_document, Page, PageConfig, PageEvent};
use vitrine_presenter::{FrameLimiter, FrameTiming, MemoryDocument, Viewport};
use vitrine_showcase::ViewerState;

use crate::boot_config::BootConfig;

/// Frame counters of one viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportReport {
    pub container: String,
    pub frames_rendered: u64,
    pub frames_failed: u64,
    /// Set for model viewers only
    pub viewer_state: Option<ViewerState>,
}

impl ViewportReport {
    fn of(viewport: &Viewport, viewer_state: Option<ViewerState>) -> Self {
        Self {
            container: viewport.container().to_string(),
            frames_rendered: viewport.frames_rendered(),
            frames_failed: viewport.frames_failed(),
            viewer_state,
        }
    }
}

/// Summary of a finished session
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub elapsed: Duration,
    pub frames: u64,
    pub average_fps: f64,
    pub viewports: Vec<ViewportReport>,
    pub interrupted: bool,
}

impl SessionReport {
    pub fn viewport(&self, container: &str) -> Option<&ViewportReport> {
        self.viewports.iter().find(|v| v.container == container)
    }

    pub fn log(&self) {
        log::info!(
            "Session: {} frames in {:.2}s (avg {:.1} fps){}",
            self.frames,
            self.elapsed.as_secs_f64(),
            self.average_fps,
            if self.interrupted { ", interrupted" } else { "" }
        );
        for v in &self.viewports {
            match v.viewer_state {
                Some(state) => log::info!(
                    "  {}: {} frames, {} failed, {:?}",
                    v.container,
                    v.frames_rendered,
                    v.frames_failed,
                    state
                ),
                None => log::info!(
                    "  {}: {} frames, {} failed",
                    v.container,
                    v.frames_rendered,
                    v.frames_failed
                ),
            }
        }
    }
}

/// Build the page described by `config`
pub fn build_page(config: &BootConfig) -> Page<MemoryDocument> {
    let document = portfolio_document(config.display.width, config.display.height);
    let assets = AssetServer::new(config.assets.clone(), Arc::new(GltfLoader::new()));
    let page_config = PageConfig {
        pixel_ratio: config.display.pixel_ratio,
        ..config.page.clone()
    };
    Page::new(document, assets, page_config)
}

/// Run the page until the session ends
pub fn run(config: &BootConfig, running: &AtomicBool) -> SessionReport {
    let mut page = build_page(config);
    let session = &config.session;

    let duration = (session.duration_secs > 0.0).then(|| Duration::from_secs_f64(session.duration_secs));
    let load_at = Duration::from_millis(session.load_after_ms);
    let stats_every = (session.stats_interval_secs > 0.0)
        .then(|| Duration::from_secs_f64(session.stats_interval_secs));

    let mut timing = FrameTiming::default();
    let mut limiter = FrameLimiter::new(config.display.target_fps);
    let mut load_sent = false;
    let mut last_stats = Duration::ZERO;
    let mut frames = 0u64;

    let start = Instant::now();
    page.advance(Duration::ZERO);
    page.handle_event(PageEvent::DomReady);

    loop {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let elapsed = start.elapsed();
        if duration.is_some_and(|d| elapsed >= d) {
            break;
        }

        timing.begin_frame();
        if !load_sent && elapsed >= load_at {
            page.handle_event(PageEvent::Load);
            load_sent = true;
        }
        page.advance(elapsed);
        frames += 1;

        if let Some(every) = stats_every {
            if elapsed - last_stats >= every {
                log::info!(
                    "{:.1} fps, {} loops, {} loads pending",
                    timing.average_fps(),
                    page.loop_count(),
                    page.assets().pending_count()
                );
                last_stats = elapsed;
            }
        }

        limiter.wait();
    }

    let interrupted = !running.load(Ordering::SeqCst);
    page.shutdown();

    let state = page.state();
    let mut viewports = Vec::new();
    if let Some(background) = &state.background {
        viewports.push(ViewportReport::of(background.viewport(), None));
    }
    if let Some(loader) = &state.loader {
        viewports.push(ViewportReport::of(loader.viewport(), None));
    }
    for viewer in state.viewers.values() {
        viewports.push(ViewportReport::of(viewer.viewport(), Some(viewer.state())));
    }

    SessionReport {
        elapsed: start.elapsed(),
        frames,
        average_fps: timing.average_fps(),
        viewports,
        interrupted,
    }
}
