//! Time-gating dialog: center/span entry with validated values, window
//! selection, apply/clear.

use egui::Context;

use crate::canvas::PlotCanvas;
use crate::network::{GateSpec, GateWindow};
use crate::value::{ValidatingField, ValueKind};

pub struct GatingDialog {
    pub open: bool,
    center: ValidatingField,
    span: ValidatingField,
    window: GateWindow,
    error: Option<String>,
}

impl Default for GatingDialog {
    fn default() -> Self {
        Self {
            open: false,
            center: ValidatingField::new(ValueKind::Time, "0 ns", 0.0),
            span: ValidatingField::new(ValueKind::Time, "1 ns", 1e-9),
            window: GateWindow::Hann,
            error: None,
        }
    }
}

impl GatingDialog {
    /// Returns true when the gate changed and the plot must be rebuilt.
    pub fn show(&mut self, ctx: &Context, canvas: &mut PlotCanvas) -> bool {
        if !self.open {
            return false;
        }
        let mut changed = false;
        let mut open = self.open;
        egui::Window::new("Time Gating")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("gating_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Center:");
                    self.center.show(ui);
                    ui.end_row();
                    ui.label("Span:");
                    self.span.show(ui);
                    ui.end_row();
                    ui.label("Window:");
                    egui::ComboBox::from_id_salt("gate_window")
                        .selected_text(self.window.label())
                        .show_ui(ui, |ui| {
                            for w in GateWindow::ALL {
                                ui.selectable_value(&mut self.window, w, w.label());
                            }
                        });
                    ui.end_row();
                });
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        match (self.center.try_value(), self.span.try_value()) {
                            (Ok(center), Ok(span)) => {
                                let spec = GateSpec {
                                    center,
                                    span,
                                    window: self.window,
                                };
                                match canvas.set_gate(Some(spec)) {
                                    Ok(()) => {
                                        self.error = None;
                                        changed = true;
                                    }
                                    Err(e) => self.error = Some(e.to_string()),
                                }
                            }
                            (Err(e), _) => self.error = Some(format!("center: {e}")),
                            (_, Err(e)) => self.error = Some(format!("span: {e}")),
                        }
                    }
                    if ui.button("Clear gate").clicked() {
                        // clearing cannot fail
                        let _ = canvas.set_gate(None);
                        self.error = None;
                        changed = true;
                    }
                });
            });
        self.open = open;
        changed
    }
}
