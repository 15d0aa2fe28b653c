//! Vitrine Runtime
//!
//! Runs the portfolio page headless: every viewport renders into an in-memory
//! surface while page events and frame loops run in real time.
//!
//! Run with: cargo run -p vitrine_runtime
//!       or: VITRINE_DURATION=0 cargo run --bin vitrine   (until Ctrl+C)

mod boot_config;
mod session;

use boot_config::BootConfig;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("PANIC: {}", panic_info);
    }));

    let config = match BootConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    config.print_summary();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down...");
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let report = session::run(&config, &running);
    report.log();
    log::info!("Vitrine runtime shutdown complete");
}
