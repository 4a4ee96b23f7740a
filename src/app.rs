use chrono::Local;
use eframe::egui;
use rusty_thermo::AppConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyThermoApp {
    pub state: AppState,
}

impl RustyThermoApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config, Local::now().date_naive()),
        }
    }
}

impl eframe::App for RustyThermoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sample form ----
        egui::SidePanel::left("form_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: results + curve ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::results(ui, &mut self.state);
            ui.separator();
            plot::temperature_plot(ui, &self.state);
        });
    }
}
