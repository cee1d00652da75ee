//! Subnetwork dialog: restrict a network to a subset of its ports.

use egui::Context;

use crate::model::NetworkModel;
use crate::trace_map::NetworkId;

#[derive(Default)]
pub struct SubnetworkDialog {
    pub open: bool,
    source: Option<NetworkId>,
    /// 1-based port list, e.g. "1,2".
    ports_text: String,
    error: Option<String>,
}

impl SubnetworkDialog {
    pub fn show(&mut self, ctx: &Context, model: &mut NetworkModel) {
        if !self.open {
            return;
        }
        let mut open = self.open;
        let mut result = None;
        egui::Window::new("Subnetwork")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                let current = self
                    .source
                    .and_then(|id| model.node(id))
                    .map(|n| n.name().to_string())
                    .unwrap_or_else(|| "—".to_string());
                ui.horizontal(|ui| {
                    ui.label("Network:");
                    egui::ComboBox::from_id_salt("subnetwork_src")
                        .selected_text(current)
                        .show_ui(ui, |ui| {
                            for node in model.nodes() {
                                ui.selectable_value(&mut self.source, Some(node.id), node.name());
                            }
                        });
                });
                ui.horizontal(|ui| {
                    ui.label("Ports (1-based):");
                    ui.text_edit_singleline(&mut self.ports_text);
                });
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
                if ui.button("Extract").clicked() {
                    match (
                        self.source.and_then(|id| model.network(id)),
                        parse_ports(&self.ports_text),
                    ) {
                        (Some(nw), Ok(ports)) => match nw.subnetwork(&ports) {
                            Ok(sub) => {
                                result = Some(sub);
                                self.error = None;
                            }
                            Err(e) => self.error = Some(e.to_string()),
                        },
                        (None, _) => self.error = Some("select a network".to_string()),
                        (_, Err(e)) => self.error = Some(e),
                    }
                }
            });
        if let Some(nw) = result {
            model.add_network(nw);
        }
        self.open = open;
    }
}

/// Parse a comma/space separated 1-based port list into 0-based indices.
fn parse_ports(text: &str) -> Result<Vec<usize>, String> {
    let mut out = Vec::new();
    for tok in text.split(|c: char| c == ',' || c.is_whitespace()) {
        if tok.is_empty() {
            continue;
        }
        let p: usize = tok
            .parse()
            .map_err(|_| format!("not a port number: {tok}"))?;
        if p == 0 {
            return Err("ports are numbered from 1".to_string());
        }
        out.push(p - 1);
    }
    if out.is_empty() {
        return Err("empty port list".to_string());
    }
    Ok(out)
}
