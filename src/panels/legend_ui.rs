//! Legend/appearance settings window.

use egui::Context;

use crate::canvas::PlotCanvas;
use crate::config::ViewerConfig;

/// Returns true when a setting changed that requires a plot rebuild.
pub fn show_legend_settings(
    ctx: &Context,
    open: &mut bool,
    canvas: &mut PlotCanvas,
    config: &mut ViewerConfig,
) -> bool {
    if !*open {
        return false;
    }
    let mut changed = false;
    egui::Window::new("Legend Settings")
        .open(open)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Columns:");
                if ui
                    .add(egui::Slider::new(&mut canvas.legend_columns, 1..=6))
                    .changed()
                {
                    config.legend_columns = canvas.legend_columns;
                }
            });
            ui.horizontal(|ui| {
                ui.label("Line width:");
                if ui
                    .add(
                        egui::DragValue::new(&mut canvas.default_width)
                            .range(0.5..=6.0)
                            .speed(0.1),
                    )
                    .changed()
                {
                    config.line_width = canvas.default_width;
                    changed = true;
                }
            });
            if ui.checkbox(&mut canvas.show_grid, "Show grid").changed() {
                config.show_grid = canvas.show_grid;
            }
        });
    changed
}
