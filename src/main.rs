// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! tocrail - Main Entry Point
//!
//! Opens the Markdown file given on the command line (or a bundled sample)
//! in a reading window with a table-of-contents rail.

use log::{info, warn};
use std::path::PathBuf;

use tocrail::app::TocRailApp;
use tocrail::config::load_config;
use tocrail::document::Document;
use tocrail::watcher::DocumentWatcher;

/// Application name constant.
const APP_NAME: &str = "tocrail";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let document = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Document::open(&path).unwrap_or_else(|e| {
            warn!("{}; showing the sample note instead", e);
            Document::sample()
        }),
        None => Document::sample(),
    };

    // Live reload is best effort; the note still opens without it.
    let watcher = document
        .path
        .as_deref()
        .and_then(|path| match DocumentWatcher::new(path) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("Live reload disabled: {}", e);
                None
            }
        });

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([400.0, 300.0])
        .with_maximized(window_size.maximized);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(TocRailApp::new(cc, settings, document, watcher)))),
    )
}
