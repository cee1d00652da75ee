//! De-embedding dialog: remove a fixture network from a measured one.
//! The result is added to the tree as a new network.

use egui::Context;

use crate::model::NetworkModel;
use crate::trace_map::NetworkId;

#[derive(Default)]
pub struct DeembedDialog {
    pub open: bool,
    dut: Option<NetworkId>,
    fixture: Option<NetworkId>,
    error: Option<String>,
}

impl DeembedDialog {
    pub fn show(&mut self, ctx: &Context, model: &mut NetworkModel) {
        if !self.open {
            return;
        }
        let mut open = self.open;
        let mut result = None;
        egui::Window::new("De-embedding")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                network_combo(ui, "Measured:", "deembed_dut", model, &mut self.dut);
                network_combo(ui, "Fixture:", "deembed_fix", model, &mut self.fixture);
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
                if ui.button("De-embed").clicked() {
                    match (
                        self.dut.and_then(|id| model.network(id)),
                        self.fixture.and_then(|id| model.network(id)),
                    ) {
                        (Some(dut), Some(fixture)) => match dut.deembed(fixture) {
                            Ok(nw) => {
                                result = Some(nw);
                                self.error = None;
                            }
                            Err(e) => self.error = Some(e.to_string()),
                        },
                        _ => self.error = Some("select both networks".to_string()),
                    }
                }
            });
        if let Some(nw) = result {
            model.add_network(nw);
        }
        self.open = open;
    }
}

fn network_combo(
    ui: &mut egui::Ui,
    label: &str,
    id_salt: &str,
    model: &NetworkModel,
    choice: &mut Option<NetworkId>,
) {
    let current = choice
        .and_then(|id| model.node(id))
        .map(|n| n.name().to_string())
        .unwrap_or_else(|| "—".to_string());
    ui.horizontal(|ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id_salt)
            .selected_text(current)
            .show_ui(ui, |ui| {
                for node in model.nodes() {
                    ui.selectable_value(choice, Some(node.id), node.name());
                }
            });
    });
}
