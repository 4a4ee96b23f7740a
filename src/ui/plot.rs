use eframe::egui::{Color32, Ui};
use egui_plot::{HLine, Legend, Line, Plot, PlotPoints, Points, VLine};
use rusty_thermo::data::thermal::{time_for_index, ANCHOR_TIME_S, REACH_TEMPERATURES};

use crate::color::generate_palette;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Temperature plot (central panel)
// ---------------------------------------------------------------------------

/// Plot the last run's log on its reindexed time axis, with the anchor and
/// the "time to reach" thresholds marked.
pub fn temperature_plot(ui: &mut Ui, state: &AppState) {
    let run = match &state.last_run {
        Some(run) => run,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Fill in the sample form and press “Generate report”");
            });
            return;
        }
    };

    let anchor = run.metrics.anchor_index;
    let points: PlotPoints = run
        .column
        .present()
        .map(|(i, v)| [time_for_index(anchor, i) as f64, v])
        .collect();
    let anchor_point = run
        .column
        .get(anchor)
        .map(|v| vec![[ANCHOR_TIME_S as f64, v]])
        .unwrap_or_default();
    let colors = generate_palette(REACH_TEMPERATURES.len());

    Plot::new("temperature_plot")
        .legend(Legend::default())
        .x_axis_label("Elapsed time [s]")
        .y_axis_label("Temperature [°C]")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name(&run.file_name)
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );

            plot_ui.vline(VLine::new(ANCHOR_TIME_S as f64).name("60 s reference").color(Color32::GRAY));
            plot_ui.points(
                Points::new(anchor_point)
                    .radius(4.0)
                    .name("anchor")
                    .color(Color32::WHITE),
            );

            for (t, color) in REACH_TEMPERATURES.iter().zip(colors) {
                plot_ui.hline(HLine::new(*t).name(format!("{t} °C")).color(color));
            }
        });
}
