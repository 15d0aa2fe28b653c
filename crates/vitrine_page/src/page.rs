//! Page orchestrator
//!
//! [`Page`] owns every scene on the page and runs on a single thread. The host
//! feeds it page events and calls [`Page::advance`] once per animation frame;
//! `advance` fires due timers, hands finished model loads to their viewers and
//! runs every frame loop once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use vitrine_asset::AssetServer;
use vitrine_presenter::{Document, FrameScheduler, LoopHandle, SurfaceConfig};
use vitrine_showcase::{
    mount_viewer, BackgroundConfig, BackgroundScene, LoaderScene, ModelViewer, ViewerConfig,
};

use crate::chrome::{AnchorOutcome, PageChrome};
use crate::layout::{FORMACION_SECTION, LOADER_OVERLAY, WALLY_CONTAINER, WALLY_CONTAINER_SIZE};
use crate::timers::{TimerId, TimerQueue};

/// Events delivered by the host document
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Document parsed; scenes and chrome initialise
    DomReady,
    /// Every resource finished loading
    Load,
    Scroll { y: f32 },
    Resize { width: u32, height: u32 },
    MenuButtonClick,
    AnchorClick { href: String },
}

/// Work deferred through the timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTask {
    MountRobotViewer,
    BuildFormacion,
    MountWallyViewer,
    FadeLoader,
    HideLoader,
}

/// Page timing and scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub background: BackgroundConfig,
    /// Device pixel ratio applied to every surface
    pub pixel_ratio: f32,
    pub robot_delay_ms: u64,
    pub formacion_delay_ms: u64,
    /// Delay after the formación section is built
    pub wally_delay_ms: u64,
    /// Delay after `Load` before the loader overlay fades
    pub loader_fade_delay_ms: u64,
    /// Delay after the fade before the overlay is hidden
    pub loader_hide_delay_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            background: BackgroundConfig::default(),
            pixel_ratio: 1.0,
            robot_delay_ms: 500,
            formacion_delay_ms: 1000,
            wally_delay_ms: 100,
            loader_fade_delay_ms: 1500,
            loader_hide_delay_ms: 500,
        }
    }
}

/// Scenes driven by frame loops
#[derive(Default)]
pub struct PageState {
    pub background: Option<BackgroundScene>,
    pub loader: Option<LoaderScene>,
    /// Model viewers keyed by container id
    pub viewers: BTreeMap<String, ModelViewer>,
}

/// The page
pub struct Page<D: Document> {
    document: D,
    config: PageConfig,
    assets: AssetServer,
    state: PageState,
    scheduler: FrameScheduler<PageState>,
    timers: TimerQueue<PageTask>,
    scheduled: Vec<TimerId>,
    chrome: Option<PageChrome>,
    loops: Vec<LoopHandle>,
    now: Duration,
    loaded: bool,
}

impl<D: Document> Page<D> {
    pub fn new(document: D, assets: AssetServer, config: PageConfig) -> Self {
        Self {
            document,
            config,
            assets,
            state: PageState::default(),
            scheduler: FrameScheduler::new(),
            timers: TimerQueue::new(),
            scheduled: Vec::new(),
            chrome: None,
            loops: Vec::new(),
            now: Duration::ZERO,
            loaded: false,
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn chrome(&self) -> Option<&PageChrome> {
        self.chrome.as_ref()
    }

    pub fn assets(&self) -> &AssetServer {
        &self.assets
    }

    /// Page time of the last `advance`
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Live frame loops
    pub fn loop_count(&self) -> usize {
        self.scheduler.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn frame_number(&self) -> u64 {
        self.scheduler.frame_number()
    }

    /// Dispatch one page event at the current page time
    pub fn handle_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::DomReady => self.on_dom_ready(),
            PageEvent::Load => self.on_load(),
            PageEvent::Scroll { y } => {
                if let Some(chrome) = self.chrome.as_mut() {
                    chrome.on_scroll(&mut self.document, y);
                }
            }
            PageEvent::Resize { width, height } => {
                if let Some(background) = self.state.background.as_mut() {
                    background.resize(width, height);
                }
            }
            PageEvent::MenuButtonClick => {
                if let Some(chrome) = self.chrome.as_mut() {
                    chrome.on_menu_click(&mut self.document);
                }
            }
            PageEvent::AnchorClick { href } => {
                self.click_anchor(&href);
            }
        }
    }

    /// Anchor click; `None` before the chrome is wired
    pub fn click_anchor(&mut self, href: &str) -> Option<AnchorOutcome> {
        let chrome = self.chrome.as_mut()?;
        Some(chrome.on_anchor_click(&mut self.document, href))
    }

    /// Move page time to `now`, then fire timers, deliver loads and run every
    /// frame loop once. Returns the number of loops that ran.
    pub fn advance(&mut self, now: Duration) -> usize {
        self.now = self.now.max(now);

        while let Some(task) = self.timers.pop_due(self.now) {
            self.run_task(task);
        }
        self.poll_assets();
        self.scheduler.tick(&mut self.state, self.now)
    }

    /// Stop every frame loop and drop tasks that have not fired yet
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        let dropped = self
            .scheduled
            .drain(..)
            .filter(|id| self.timers.cancel(*id))
            .count();
        log::info!(
            "Page stopped after {} frames ({} loops cancelled, {} tasks dropped)",
            self.scheduler.frame_number(),
            self.loops.len(),
            dropped
        );
        self.loops.clear();
    }

    fn on_dom_ready(&mut self) {
        if self.chrome.is_some() {
            log::warn!("DomReady delivered twice, ignoring");
            return;
        }
        log::info!("Initializing page");

        self.init_loader();
        self.init_background();
        self.chrome = Some(PageChrome::init(&self.document));
    }

    fn on_load(&mut self) {
        if self.chrome.is_none() {
            log::debug!("Load before DomReady, ignoring");
            return;
        }
        if self.loaded {
            log::debug!("Load delivered twice, ignoring");
            return;
        }
        self.loaded = true;
        self.schedule(self.config.loader_fade_delay_ms, PageTask::FadeLoader);
    }

    fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig::default().with_pixel_ratio(self.config.pixel_ratio)
    }

    fn init_loader(&mut self) {
        let surface = self.surface_config();
        let Some(loader) = LoaderScene::mount(&mut self.document, &surface) else {
            return;
        };
        self.state.loader = Some(loader);
        let handle = self.scheduler.register("loader", |state: &mut PageState, ctx| {
            if let Some(loader) = state.loader.as_mut() {
                loader.frame(ctx);
            }
        });
        self.loops.push(handle);
    }

    fn init_background(&mut self) {
        let surface = self.surface_config();
        if let Some(background) =
            BackgroundScene::mount(&mut self.document, &self.config.background, &surface)
        {
            self.state.background = Some(background);
            let handle = self.scheduler.register("background", |state: &mut PageState, ctx| {
                if let Some(background) = state.background.as_mut() {
                    background.frame(ctx);
                }
            });
            self.loops.push(handle);
        }

        self.mount_named_viewer(ViewerConfig::azure());
        self.mount_named_viewer(ViewerConfig::cisco());
        self.schedule(self.config.robot_delay_ms, PageTask::MountRobotViewer);
        self.schedule(self.config.formacion_delay_ms, PageTask::BuildFormacion);
    }

    fn schedule(&mut self, delay_ms: u64, task: PageTask) {
        log::debug!("Scheduling {:?} in {} ms", task, delay_ms);
        let id = self
            .timers
            .schedule(self.now, Duration::from_millis(delay_ms), task);
        self.scheduled.push(id);
    }

    fn run_task(&mut self, task: PageTask) {
        log::debug!("Running {:?} at {:?}", task, self.now);
        match task {
            PageTask::MountRobotViewer => {
                self.mount_named_viewer(ViewerConfig::robot());
            }
            PageTask::BuildFormacion => self.build_formacion(),
            PageTask::MountWallyViewer => {
                self.mount_named_viewer(ViewerConfig::wally());
            }
            PageTask::FadeLoader => {
                if self.document.set_opacity(LOADER_OVERLAY, 0.0) {
                    self.schedule(self.config.loader_hide_delay_ms, PageTask::HideLoader);
                }
            }
            PageTask::HideLoader => {
                self.document.set_visible(LOADER_OVERLAY, false);
            }
        }
    }

    fn build_formacion(&mut self) {
        if !self.document.element_exists(FORMACION_SECTION) {
            log::debug!("No '{}' section, skipping decoration", FORMACION_SECTION);
            return;
        }
        if self.document.element_exists(WALLY_CONTAINER) {
            log::info!("Formación decoration already present");
            return;
        }
        if !self
            .document
            .insert_container(FORMACION_SECTION, WALLY_CONTAINER, WALLY_CONTAINER_SIZE)
        {
            log::warn!("Could not create '{}'", WALLY_CONTAINER);
            return;
        }
        log::info!("Formación decoration created");
        self.schedule(self.config.wally_delay_ms, PageTask::MountWallyViewer);
    }

    /// Mount a viewer unless its container already has one
    fn mount_named_viewer(&mut self, config: ViewerConfig) -> bool {
        if self.state.viewers.contains_key(&config.container) {
            log::debug!("Viewer for '{}' already mounted", config.container);
            return false;
        }
        let config = config.with_pixel_ratio(self.config.pixel_ratio);
        match mount_viewer(&mut self.document, &self.assets, &config) {
            Some(viewer) => {
                self.state.viewers.insert(config.container.clone(), viewer);
                true
            }
            None => false,
        }
    }

    fn poll_assets(&mut self) {
        for completion in self.assets.poll() {
            let document = &mut self.document;
            let owner = self
                .state
                .viewers
                .iter_mut()
                .find_map(|(key, viewer)| viewer.complete(document, &completion).then(|| key.clone()));

            let Some(key) = owner else {
                log::warn!(
                    "No viewer waiting for {} ({})",
                    completion.handle.path().display(),
                    completion.handle.id()
                );
                continue;
            };

            if self.state.viewers.get(&key).is_some_and(|v| v.is_ready()) {
                self.register_viewer_loop(key);
            }
        }
    }

    fn register_viewer_loop(&mut self, key: String) {
        let name = format!("viewer:{}", key);
        let handle = self.scheduler.register(name, move |state: &mut PageState, ctx| {
            if let Some(viewer) = state.viewers.get_mut(&key) {
                viewer.frame(ctx);
            }
        });
        self.loops.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use vitrine_asset::{AssetServerConfig, MemoryLoader};
    use vitrine_presenter::MemoryDocument;

    fn page(document: MemoryDocument) -> Page<MemoryDocument> {
        let assets = AssetServer::new(
            AssetServerConfig {
                asset_dir: PathBuf::new(),
                worker_threads: 0,
            },
            Arc::new(MemoryLoader::new()),
        );
        Page::new(document, assets, PageConfig::default())
    }

    #[test]
    fn test_events_before_dom_ready_are_ignored() {
        let mut page = page(MemoryDocument::default().with_element("navbar", (100, 10)));
        page.handle_event(PageEvent::Scroll { y: 200.0 });
        page.handle_event(PageEvent::MenuButtonClick);
        assert!(page.click_anchor("#navbar").is_none());
        assert!(!page.document().has_class("navbar", "scrolled"));
        assert_eq!(page.advance(Duration::from_millis(16)), 0);
    }

    #[test]
    fn test_empty_document_schedules_but_mounts_nothing() {
        let mut page = page(MemoryDocument::default());
        page.handle_event(PageEvent::DomReady);
        assert_eq!(page.pending_timers(), 2);

        for ms in (0..=1200).step_by(50) {
            page.advance(Duration::from_millis(ms));
        }
        assert!(page.state().viewers.is_empty());
        assert!(page.state().background.is_none());
        assert_eq!(page.loop_count(), 0);
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_load_before_dom_ready_is_ignored() {
        let mut page = page(MemoryDocument::default().with_element("loader", (100, 100)));
        page.handle_event(PageEvent::Load);
        assert_eq!(page.pending_timers(), 0);

        page.handle_event(PageEvent::DomReady);
        let scheduled = page.pending_timers();
        page.handle_event(PageEvent::Load);
        assert_eq!(page.pending_timers(), scheduled + 1);
    }

    #[test]
    fn test_time_never_goes_backwards() {
        let mut page = page(MemoryDocument::default());
        page.advance(Duration::from_millis(100));
        page.advance(Duration::from_millis(40));
        assert_eq!(page.now(), Duration::from_millis(100));
    }
}
