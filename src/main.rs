mod app;
mod color;
mod state;
mod ui;

use app::RustyThermoApp;
use eframe::egui;
use rusty_thermo::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {e:#}");
        AppConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Thermo – Thermal Report Builder",
        options,
        Box::new(|_cc| Ok(Box::new(RustyThermoApp::new(config)))),
    )
}
