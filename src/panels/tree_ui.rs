//! Left-hand network tree: one collapsible row per network, checkable
//! S-parameter children, context menu with the usual operations.

use egui::Ui;

use crate::model::{NetworkModel, NodeRef};
use crate::trace_map::{NetworkId, TraceId};

pub struct TreePanel {
    pub selection: Option<NodeRef>,
    /// In-progress rename: network id plus edit buffer.
    rename: Option<(NetworkId, String)>,
}

impl Default for TreePanel {
    fn default() -> Self {
        Self {
            selection: None,
            rename: None,
        }
    }
}

impl TreePanel {
    /// Select the param backing a picked trace (plot → tree sync).
    pub fn select_trace(&mut self, trace: Option<TraceId>) {
        self.selection = trace.map(NodeRef::Param);
    }

    /// Begin renaming a network inline.
    pub fn start_rename(&mut self, model: &NetworkModel, id: NetworkId) {
        if let Some(node) = model.node(id) {
            self.rename = Some((id, node.name().to_string()));
        }
    }

    pub fn show(&mut self, ui: &mut Ui, model: &mut NetworkModel) {
        ui.heading("Networks");
        ui.separator();
        if model.is_empty() {
            ui.weak("Drop Touchstone files here\nor use File → Open.");
            return;
        }

        // collect mutations, apply after the loop to keep the borrow simple
        let mut to_remove: Option<NodeRef> = None;
        let mut to_copy: Option<NetworkId> = None;
        let mut set_enabled: Option<(NodeRef, bool)> = None;
        let mut toggled: Option<(TraceId, bool)> = None;
        let mut start_rename: Option<NetworkId> = None;
        let mut commit_rename: Option<(NetworkId, String)> = None;

        for node in model.nodes() {
            let id = node.id;
            let renaming = matches!(self.rename, Some((rid, _)) if rid == id);
            let header = egui::CollapsingHeader::new(node.name())
                .id_salt(id.0)
                .default_open(true);
            let resp = header.show(ui, |ui| {
                for p in &node.params {
                    let tid = TraceId::new(id, p.m, p.n);
                    let mut checked = p.checked;
                    let selected = self.selection == Some(NodeRef::Param(tid));
                    ui.horizontal(|ui| {
                        if ui.checkbox(&mut checked, "").changed() {
                            toggled = Some((tid, checked));
                        }
                        if ui.selectable_label(selected, p.label()).clicked() {
                            self.selection = Some(NodeRef::Param(tid));
                        }
                    });
                }
            });
            resp.header_response.context_menu(|ui| {
                if ui.button("Show all").clicked() {
                    set_enabled = Some((NodeRef::Network(id), true));
                    ui.close();
                }
                if ui.button("Hide all").clicked() {
                    set_enabled = Some((NodeRef::Network(id), false));
                    ui.close();
                }
                ui.separator();
                if ui.button("Copy").clicked() {
                    to_copy = Some(id);
                    ui.close();
                }
                if ui.button("Rename").clicked() {
                    start_rename = Some(id);
                    ui.close();
                }
                if ui.button("Delete").clicked() {
                    to_remove = Some(NodeRef::Network(id));
                    ui.close();
                }
            });
            if resp.header_response.clicked() {
                self.selection = Some(NodeRef::Network(id));
            }
            if renaming {
                if let Some((_, buf)) = &mut self.rename {
                    let edit = ui.text_edit_singleline(buf);
                    if edit.lost_focus() {
                        if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            commit_rename = Some((id, buf.clone()));
                        }
                        self.rename = None;
                    }
                }
            }
        }

        if let Some((tid, checked)) = toggled {
            model.set_checked(tid, checked);
        }
        if let Some((target, enabled)) = set_enabled {
            model.set_enabled(target, enabled);
        }
        if let Some(id) = to_copy {
            model.copy_network(id);
        }
        if let Some(id) = start_rename {
            self.start_rename(model, id);
        }
        if let Some((id, name)) = commit_rename {
            if !name.trim().is_empty() {
                model.rename_network(id, name.trim());
            }
        }
        if let Some(target) = to_remove {
            if self.selection == Some(target) {
                self.selection = None;
            }
            model.remove(target);
        }
    }

    /// Keyboard shortcuts on the tree selection: D disables, E enables,
    /// Delete removes the selected node.
    pub fn handle_keys(&mut self, ui: &Ui, model: &mut NetworkModel) {
        // a focused text edit owns the keyboard
        if ui.ctx().wants_keyboard_input() {
            return;
        }
        let (d, e, del) = ui.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::E),
                i.key_pressed(egui::Key::Delete),
            )
        });
        self.apply_key_actions(model, d, e, del);
    }

    /// Inert while an inline rename is open: 'd', 'e' and Delete are then
    /// edits to the name buffer, not tree operations.
    fn apply_key_actions(&mut self, model: &mut NetworkModel, d: bool, e: bool, del: bool) {
        if self.rename.is_some() {
            return;
        }
        let Some(sel) = self.selection else {
            return;
        };
        if d {
            model.set_enabled(sel, false);
        }
        if e {
            model.set_enabled(sel, true);
        }
        if del {
            self.selection = None;
            model.remove(sel);
        }
    }
}
