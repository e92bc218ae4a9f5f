mod analysis;
mod app;
mod color;
mod config;
mod data;
mod error;
mod pipeline;
mod state;
mod ui;

use app::AirQualityApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let mut config = DashboardConfig::load().unwrap_or_else(|e| {
        log::warn!("Using default configuration: {e:#}");
        DashboardConfig::default()
    });
    if let Some(source) = std::env::args().nth(1) {
        config.source = source;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Air Quality Dashboard",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the bundled logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AirQualityApp::new(config)))
        }),
    )
}
