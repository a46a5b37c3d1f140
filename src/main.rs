mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::ReelScopeApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional catalog path to open at startup.
    let catalog_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ReelScope – Catalog Explorer",
        options,
        Box::new(move |_cc| {
            let app = match &catalog_path {
                Some(path) => ReelScopeApp::with_catalog(path),
                None => ReelScopeApp::default(),
            };
            Ok(Box::new(app))
        }),
    )
}
