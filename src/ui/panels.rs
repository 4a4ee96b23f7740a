use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use rusty_thermo::data::thermal::{REACH_TEMPERATURES, SAMPLE_TIMES_S};

use crate::state::{AppState, Upload};

// ---------------------------------------------------------------------------
// Left side panel – sample form
// ---------------------------------------------------------------------------

/// Render the left form panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sample");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Files ----
            ui.strong("Files");
            file_row(ui, state, Upload::Log, "Temperature log");
            file_row(ui, state, Upload::Template, "Report template");
            ui.separator();

            // ---- Fields ----
            egui::Grid::new("form_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui: &mut Ui| {
                    let f = &mut state.fields;
                    text_row(ui, "Sample name", &mut f.sample_name, "");
                    text_row(ui, "Temp. at 60 s", &mut f.reference_temperature, "°C");

                    ui.label("Evaluation date");
                    ui.add(DatePickerButton::new(&mut state.evaluation_date));
                    ui.end_row();

                    let f = &mut state.fields;
                    text_row(ui, "Thickness", &mut f.thickness_mm, "mm");
                    text_row(ui, "Weight", &mut f.weight_g, "g");
                    text_row(ui, "Width", &mut f.width_mm, "mm");
                    text_row(ui, "Length", &mut f.length_mm, "mm");
                    text_row(ui, "Heat setting", &mut f.heat_setting, "");
                    text_row(ui, "Pressure", &mut f.pressure, "");
                });

            ui.add_space(4.0);
            ui.label("Remarks");
            ui.add(
                egui::TextEdit::multiline(&mut state.fields.remarks)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(8.0);
            if ui.button(RichText::new("Generate report").strong()).clicked() {
                state.run_report(Local::now().date_naive());
            }
        });
}

fn text_row(ui: &mut Ui, label: &str, value: &mut String, unit: &str) {
    ui.label(label);
    ui.horizontal(|ui: &mut Ui| {
        ui.add(egui::TextEdit::singleline(value).desired_width(140.0));
        if !unit.is_empty() {
            ui.label(unit);
        }
    });
    ui.end_row();
}

fn file_row(ui: &mut Ui, state: &mut AppState, upload: Upload, label: &str) {
    let current = match upload {
        Upload::Log => &state.log_file,
        Upload::Template => &state.template_file,
    }
    .as_ref()
    .map(|f| f.name.clone());

    ui.horizontal(|ui: &mut Ui| {
        if ui.button(format!("{label}…")).clicked() {
            open_file_dialog(state, upload);
        }
        match current {
            Some(name) => ui.label(name),
            None => ui.weak("none selected"),
        };
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open temperature log…").clicked() {
                open_file_dialog(state, Upload::Log);
                ui.close_menu();
            }
            if ui.button("Open report template…").clicked() {
                open_file_dialog(state, Upload::Template);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.last_run.is_some(), egui::Button::new("Save report…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if state.status_is_error {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Results summary
// ---------------------------------------------------------------------------

/// Render the metrics and properties of the last run.
pub fn results(ui: &mut Ui, state: &mut AppState) {
    let mut save_clicked = false;

    if let Some(run) = &state.last_run {
        let na = state.config.not_available_label.as_str();

        ui.horizontal(|ui: &mut Ui| {
            ui.strong(&run.file_name);
            save_clicked = ui.button("Save report…").clicked();
        });

        egui::Grid::new("results_grid")
            .num_columns(4)
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                for (i, t) in REACH_TEMPERATURES.iter().enumerate() {
                    ui.label(format!("Time to {t} °C"));
                    ui.label(
                        run.metrics.time_to_reach[i]
                            .map_or_else(|| na.to_string(), |s| format!("{s} s")),
                    );
                    ui.label(format!("Temp. at {} s", SAMPLE_TIMES_S[i]));
                    ui.label(
                        run.metrics.temperature_at[i]
                            .map_or_else(|| na.to_string(), |v| format!("{v} °C")),
                    );
                    ui.end_row();
                }
                ui.label("Areal weight");
                ui.label(format!("{:.2} g/m²", run.properties.areal_weight));
                ui.label("Density");
                ui.label(format!("{:.2} kg/m³", run.properties.density));
                ui.end_row();
            });
    }

    if save_clicked {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, upload: Upload) {
    let title = match upload {
        Upload::Log => "Open temperature log",
        Upload::Template => "Open report template",
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_upload(upload, &path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let Some(default_name) = state.last_run.as_ref().map(|r| r.file_name.clone()) else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Save report")
        .set_file_name(default_name)
        .add_filter("Excel", &["xlsx"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_report(&path) {
            state.set_error(&e);
        }
    }
}
