//! Page timeline tests on the in-memory portfolio document

use approx::assert_relative_eq;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vitrine_asset::{AssetServer, AssetServerConfig, MemoryLoader, ModelScene};
use vitrine_page::{portfolio_document, NavbarState, Page, PageConfig, PageEvent};
use vitrine_presenter::{Document, MemoryDocument};
use vitrine_render::{Geometry, Material};
use vitrine_showcase::{BackgroundConfig, ViewerState};

const ROBOT: &str = "experiencia-3d-right";
const WALLY: &str = "formacion-wally-3d";

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn model(edge: f32) -> ModelScene {
    ModelScene::from_geometry("model", Geometry::cuboid(edge, edge * 2.0, edge), Material::default())
}

fn loader(skip: &[&str]) -> MemoryLoader {
    let loader = MemoryLoader::new();
    for path in [
        "models/AZURE3D.glb",
        "models/cisco.glb",
        "models/ROBOT1.glb",
        "models/wally.glb",
    ] {
        if !skip.contains(&path) {
            loader.insert(path, model(4.0));
        }
    }
    loader
}

fn config() -> PageConfig {
    PageConfig {
        background: BackgroundConfig {
            particle_count: 200,
            seed: Some(42),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn page_with(document: MemoryDocument, loader: MemoryLoader) -> Page<MemoryDocument> {
    let assets = AssetServer::new(
        AssetServerConfig {
            asset_dir: PathBuf::new(),
            worker_threads: 0,
        },
        Arc::new(loader),
    );
    Page::new(document, assets, config())
}

fn started(loader: MemoryLoader) -> Page<MemoryDocument> {
    let mut page = page_with(portfolio_document(1280, 720), loader);
    page.advance(ms(0));
    page.handle_event(PageEvent::DomReady);
    page
}

/// Advance in 16 ms frames up to and including `to`
fn run_until(page: &mut Page<MemoryDocument>, to: u64) {
    let mut t = page.now().as_millis() as u64;
    while t + 16 < to {
        t += 16;
        page.advance(ms(t));
    }
    page.advance(ms(to));
}

#[test]
fn test_dom_ready_mounts_immediate_scenes() {
    let mut page = started(loader(&[]));
    assert!(page.state().loader.is_some());
    assert!(page.state().background.is_some());
    assert_eq!(page.state().viewers.len(), 2);
    assert_eq!(page.loop_count(), 2);

    // Loads finish in the first poll, before that tick's loops run
    assert_eq!(page.advance(ms(16)), 4);
    assert_eq!(page.loop_count(), 4);
    assert!(page.state().viewers.values().all(|v| v.is_ready()));
}

#[test]
fn test_staggered_viewers() {
    let mut page = started(loader(&[]));

    run_until(&mut page, 499);
    assert!(!page.state().viewers.contains_key(ROBOT));
    run_until(&mut page, 500);
    assert!(page.state().viewers.contains_key(ROBOT));

    run_until(&mut page, 999);
    assert!(!page.document().element_exists(WALLY));
    run_until(&mut page, 1000);
    assert!(page.document().element_exists(WALLY));
    assert_eq!(page.document().element_size(WALLY), Some((200, 200)));
    assert!(!page.state().viewers.contains_key(WALLY));

    run_until(&mut page, 1100);
    assert!(page.state().viewers.contains_key(WALLY));
    run_until(&mut page, 1200);
    assert_eq!(page.state().viewers[WALLY].state(), ViewerState::Ready);
    assert_eq!(page.loop_count(), 6);
    assert_eq!(page.pending_timers(), 0);
}

#[test]
fn test_existing_formacion_container_is_kept() {
    let document = portfolio_document(1280, 720).with_element(WALLY, (300, 300));
    let mut page = page_with(document, loader(&[]));
    page.advance(ms(0));
    page.handle_event(PageEvent::DomReady);

    run_until(&mut page, 1500);
    assert_eq!(page.document().element_size(WALLY), Some((300, 300)));
    assert!(!page.state().viewers.contains_key(WALLY));
}

#[test]
fn test_loader_overlay_timeline() {
    let mut page = started(loader(&[]));
    run_until(&mut page, 2000);
    page.handle_event(PageEvent::Load);

    run_until(&mut page, 3499);
    assert_relative_eq!(page.document().element("loader").unwrap().opacity, 1.0);
    run_until(&mut page, 3500);
    assert_relative_eq!(page.document().element("loader").unwrap().opacity, 0.0);
    assert!(page.document().element("loader").unwrap().visible);

    run_until(&mut page, 3999);
    assert!(page.document().element("loader").unwrap().visible);
    run_until(&mut page, 4000);
    assert!(!page.document().element("loader").unwrap().visible);

    // The loader animation keeps running once hidden
    let before = page.document().surface_stats("loader-3d-container").unwrap().frames_rendered();
    run_until(&mut page, 4100);
    let after = page.document().surface_stats("loader-3d-container").unwrap().frames_rendered();
    assert!(after > before);
}

#[test]
fn test_scroll_class_transitions() {
    let mut page = started(loader(&[]));
    for y in [0.0, 80.0, 90.0, 10.0, 0.0] {
        page.handle_event(PageEvent::Scroll { y });
        if y == 80.0 {
            assert!(page.document().has_class("navbar", "scrolled"));
        }
    }
    assert!(!page.document().has_class("navbar", "scrolled"));
    assert_eq!(page.document().element("navbar").unwrap().class_mutations, 2);
    assert_eq!(page.chrome().unwrap().navbar(), NavbarState::Expanded);
}

#[test]
fn test_menu_and_anchor() {
    let mut page = started(loader(&[]));
    page.handle_event(PageEvent::MenuButtonClick);
    assert!(page.document().has_class("nav-links", "active"));

    page.handle_event(PageEvent::AnchorClick {
        href: "#experiencia".to_string(),
    });
    assert!(!page.document().has_class("nav-links", "active"));
    assert_eq!(page.document().element("experiencia").unwrap().scroll_requests, 1);

    let outcome = page.click_anchor("#no-such-section").unwrap();
    assert!(outcome.default_prevented);
    assert!(outcome.scrolled_to.is_none());
}

#[test]
fn test_missing_robot_model_falls_back() {
    let mut page = started(loader(&["models/ROBOT1.glb"]));
    run_until(&mut page, 700);

    let robot = &page.state().viewers[ROBOT];
    assert_eq!(robot.state(), ViewerState::Failed);
    assert!(robot.model().is_none());
    assert_eq!(page.document().glyphs(ROBOT).len(), 1);
    assert_eq!(page.document().glyphs(ROBOT)[0].icon, "fas fa-robot");
    // Loader, background and both hero viewers; no loop for the robot
    assert_eq!(page.loop_count(), 4);
    assert!(page.document().glyphs("model-container-1").is_empty());
}

#[test]
fn test_resize_reaches_background() {
    let mut page = started(loader(&[]));
    page.handle_event(PageEvent::Resize {
        width: 1000,
        height: 333,
    });
    let background = page.state().background.as_ref().unwrap();
    assert_eq!(background.viewport().camera().aspect, 1000.0 / 333.0);
    assert_eq!(background.viewport().size(), (1000, 333));
}

#[test]
fn test_shutdown_stops_loops() {
    let mut page = started(loader(&[]));
    run_until(&mut page, 100);
    assert!(page.loop_count() > 0);
    page.shutdown();
    assert_eq!(page.advance(ms(116)), 0);
    assert_eq!(page.loop_count(), 0);
}

#[test]
fn test_shutdown_drops_pending_tasks() {
    let mut page = started(loader(&[]));
    run_until(&mut page, 100);
    page.handle_event(PageEvent::Load);
    assert!(page.pending_timers() > 0);

    page.shutdown();
    assert_eq!(page.pending_timers(), 0);

    run_until(&mut page, 5000);
    assert!(!page.state().viewers.contains_key(ROBOT));
    assert!(!page.document().element_exists(WALLY));
    assert_relative_eq!(page.document().element("loader").unwrap().opacity, 1.0);
    assert_eq!(page.loop_count(), 0);
}
