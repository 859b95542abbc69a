mod app;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;

use std::path::Path;

use anyhow::Result;
use app::DashboardApp;
use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let title = config.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the png banner.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
