//! Main application: window layout, menus, file loading, and the glue
//! between model events, the pick machinery and the canvas.

use std::path::PathBuf;

use eframe::egui;

use crate::canvas::{PlotCanvas, PlotMode};
use crate::config::ViewerConfig;
use crate::events::{EventBus, EventKind, ViewerEvent};
use crate::export;
use crate::model::{ModelEvent, NetworkModel, NodeRef};
use crate::network::Network;
use crate::panels::{
    show_legend_settings, DeembedDialog, GatingDialog, SubnetworkDialog, TreePanel,
};
use crate::pick::PickEffect;
use crate::plot_ui::PlotArea;
use crate::session::SessionState;
use crate::trace_map::TraceId;

pub struct ViewerApp {
    pub model: NetworkModel,
    pub canvas: PlotCanvas,
    pub bus: EventBus,
    config: ViewerConfig,
    tree: TreePanel,
    plot_area: PlotArea,
    gating: GatingDialog,
    deembed: DeembedDialog,
    subnetwork: SubnetworkDialog,
    legend_settings_open: bool,
    /// In-progress trace rename (F2): trace plus edit buffer.
    rename_edit: Option<(TraceId, String)>,
    error_modal: Option<String>,
    pending_screenshot: Option<PathBuf>,
    pending_clipboard: bool,
    /// Source files of the loaded networks, for session save.
    loaded_paths: Vec<PathBuf>,
    needs_redraw: bool,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_config(ViewerConfig::load())
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        let mut canvas = PlotCanvas::new();
        canvas.default_width = config.line_width;
        canvas.legend_columns = config.legend_columns;
        canvas.show_grid = config.show_grid;
        canvas.set_mode(config.mode);
        Self {
            model: NetworkModel::new(),
            canvas,
            bus: EventBus::new(),
            config,
            tree: TreePanel::default(),
            plot_area: PlotArea::default(),
            gating: GatingDialog::default(),
            deembed: DeembedDialog::default(),
            subnetwork: SubnetworkDialog::default(),
            legend_settings_open: false,
            rename_edit: None,
            error_modal: None,
            pending_screenshot: None,
            pending_clipboard: false,
            loaded_paths: Vec::new(),
            needs_redraw: false,
        }
    }

    pub fn open_files(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            match Network::from_touchstone(&path) {
                Ok(nw) => {
                    let id = self.model.add_network(nw);
                    self.loaded_paths.push(path.clone());
                    self.bus
                        .emit(ViewerEvent::new(EventKind::NETWORK_ADDED).with_network(id));
                }
                Err(e) => {
                    eprintln!("Failed to load {}: {e}", path.display());
                    self.error_modal = Some(format!("{}:\n{e}", path.display()));
                }
            }
        }
    }

    fn session_state(&self) -> SessionState {
        SessionState {
            files: self.loaded_paths.clone(),
            mode: self.canvas.mode(),
            legend_columns: self.canvas.legend_columns,
            show_grid: self.canvas.show_grid,
            line_width: self.canvas.default_width,
        }
    }

    fn apply_session(&mut self, state: SessionState) {
        self.model.reset();
        self.loaded_paths.clear();
        self.canvas.set_mode(state.mode);
        self.canvas.legend_columns = state.legend_columns;
        self.canvas.show_grid = state.show_grid;
        self.canvas.default_width = state.line_width;
        self.open_files(state.files);
        self.needs_redraw = true;
    }

    fn set_mode(&mut self, mode: PlotMode) {
        if self.canvas.mode() == mode {
            return;
        }
        self.canvas.set_mode(mode);
        self.config.mode = mode;
        self.needs_redraw = true;
        self.bus.emit(
            ViewerEvent::new(EventKind::MODE_CHANGED).with_detail(mode.label()),
        );
    }

    fn apply_pick_effects(&mut self, effects: Vec<PickEffect>) {
        for effect in effects {
            match effect {
                PickEffect::SelectionChanged(trace) => {
                    self.tree.select_trace(trace);
                    let ev = match trace {
                        Some(t) => {
                            ViewerEvent::new(EventKind::SELECTION_CHANGED | EventKind::TRACE_PICKED)
                                .with_trace(t)
                        }
                        None => ViewerEvent::new(EventKind::SELECTION_CHANGED),
                    };
                    self.bus.emit(ev);
                }
                PickEffect::RequestUncheck(trace) => {
                    self.model.set_checked(trace, false);
                }
                // width effects are applied inside the canvas
                PickEffect::Highlight(_)
                | PickEffect::Unhighlight(_)
                | PickEffect::ResetAllWidths => {}
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        use egui_phosphor::regular as icons;
        ui.menu_button("File", |ui| {
            if ui.button("New").clicked() {
                self.model.reset();
                self.loaded_paths.clear();
                self.bus.emit(ViewerEvent::new(EventKind::DATA_CLEARED));
                ui.close();
            }
            if ui
                .button(format!("{} Open…", icons::FOLDER_OPEN))
                .clicked()
            {
                if let Some(paths) = rfd::FileDialog::new()
                    .add_filter("Touchstone", &["s1p", "s2p", "s3p", "s4p", "snp"])
                    .pick_files()
                {
                    self.open_files(paths);
                }
                ui.close();
            }
            ui.separator();
            if ui
                .button(format!("{} Export CSV…", icons::FILE_CSV))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("traces.csv")
                    .add_filter("CSV", &["csv"])
                    .save_file()
                {
                    self.export_csv(&path);
                }
                ui.close();
            }
            if ui.button("Export TikZ…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("traces.tex")
                    .add_filter("TeX", &["tex"])
                    .save_file()
                {
                    self.export_tikz(&path);
                }
                ui.close();
            }
            if ui
                .button(format!("{} Save Screenshot…", icons::CAMERA))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("screenshot.png")
                    .add_filter("PNG", &["png"])
                    .save_file()
                {
                    self.pending_screenshot = Some(path);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
                }
                ui.close();
            }
            if ui.button("Copy Image").clicked() {
                self.pending_clipboard = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
                ui.close();
            }
            ui.separator();
            if ui.button("Save state…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_file_name("session.json")
                    .add_filter("JSON", &["json"])
                    .save_file()
                {
                    let state = self.session_state();
                    if let Err(e) = state.save(&path) {
                        eprintln!("Failed to save session: {e:#}");
                        self.error_modal = Some(format!("Saving session failed:\n{e:#}"));
                    }
                }
                ui.close();
            }
            if ui.button("Load state…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                {
                    match SessionState::load(&path) {
                        Ok(state) => self.apply_session(state),
                        Err(e) => {
                            eprintln!("Failed to load session: {e:#}");
                            self.error_modal = Some(format!("Loading session failed:\n{e:#}"));
                        }
                    }
                }
                ui.close();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        ui.menu_button("View", |ui| {
            for mode in PlotMode::ALL {
                if ui
                    .radio(self.canvas.mode() == mode, mode.label())
                    .clicked()
                {
                    self.set_mode(mode);
                    ui.close();
                }
            }
            ui.separator();
            if ui
                .checkbox(&mut self.canvas.show_grid, "Show grid")
                .changed()
            {
                self.config.show_grid = self.canvas.show_grid;
            }
            if ui.button("Legend Settings…").clicked() {
                self.legend_settings_open = true;
                ui.close();
            }
            if ui.button("Reset zoom").clicked() {
                self.canvas.clear_x_range();
                ui.close();
            }
        });
        ui.menu_button("Tools", |ui| {
            if ui.button("Time Gating…").clicked() {
                self.gating.open = true;
                ui.close();
            }
            if ui.button("De-embedding…").clicked() {
                self.deembed.open = true;
                ui.close();
            }
            if ui.button("Subnetwork…").clicked() {
                self.subnetwork.open = true;
                ui.close();
            }
            if ui.button("Zero reflection").clicked() {
                if let Some(NodeRef::Network(id)) = self.tree.selection {
                    if let Some(nw) = self.model.network(id) {
                        let z = nw.with_zero_reflection();
                        self.model.add_network(z);
                    }
                }
                ui.close();
            }
            ui.separator();
            if ui
                .button(format!("{} Remove all networks", icons::TRASH))
                .clicked()
            {
                self.model.reset();
                self.loaded_paths.clear();
                self.bus.emit(ViewerEvent::new(EventKind::DATA_CLEARED));
                ui.close();
            }
        });
    }

    fn export_csv(&mut self, path: &std::path::Path) {
        let result = std::fs::File::create(path).map_err(export::ExportError::from).and_then(
            |file| {
                export::write_csv(
                    std::io::BufWriter::new(file),
                    self.canvas.curves(),
                    export::x_label_for(&self.canvas),
                )
            },
        );
        match result {
            Ok(()) => self.bus.emit(
                ViewerEvent::new(EventKind::EXPORT).with_detail(path.display().to_string()),
            ),
            Err(e) => {
                eprintln!("CSV export failed: {e}");
                self.error_modal = Some(format!("CSV export failed:\n{e}"));
            }
        }
    }

    fn export_tikz(&mut self, path: &std::path::Path) {
        let result = std::fs::File::create(path).map_err(export::ExportError::from).and_then(
            |file| {
                export::write_tikz(
                    std::io::BufWriter::new(file),
                    self.canvas.curves(),
                    export::x_label_for(&self.canvas),
                    self.canvas.mode().y_label(),
                )
            },
        );
        match result {
            Ok(()) => self.bus.emit(
                ViewerEvent::new(EventKind::EXPORT).with_detail(path.display().to_string()),
            ),
            Err(e) => {
                eprintln!("TikZ export failed: {e}");
                self.error_modal = Some(format!("TikZ export failed:\n{e}"));
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        // a focused text edit owns the keyboard
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete, f2) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete),
                i.key_pressed(egui::Key::F2),
            )
        });
        self.apply_shortcut_keys(delete, f2);
    }

    /// Global shortcuts on the picked trace. Inert while a rename window
    /// is open so Delete edits the label buffer instead of unchecking the
    /// trace being renamed.
    fn apply_shortcut_keys(&mut self, delete: bool, f2: bool) {
        if self.rename_edit.is_some() {
            return;
        }
        // Delete acts on the picked trace first; the tree handles it when
        // nothing is picked.
        if delete && self.canvas.pick.picked().is_some() {
            let effects = self.canvas.handle_delete();
            self.apply_pick_effects(effects);
        }
        if f2 {
            if let Some(id) = self.canvas.pick.rename_target() {
                let current = self
                    .canvas
                    .curves()
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.label.clone())
                    .unwrap_or_default();
                self.rename_edit = Some((id, current));
            }
        }
    }

    fn show_rename_window(&mut self, ctx: &egui::Context) {
        let Some((id, mut buf)) = self.rename_edit.take() else {
            return;
        };
        let mut done = false;
        egui::Window::new("Rename trace")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let edit = ui.text_edit_singleline(&mut buf);
                edit.request_focus();
                ui.horizontal(|ui| {
                    let commit = ui.button("OK").clicked()
                        || ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if commit {
                        // empty input keeps the old label
                        if !buf.trim().is_empty() {
                            self.canvas.rename_label(id, buf.trim());
                            self.bus.emit(
                                ViewerEvent::new(EventKind::TRACE_RENAMED).with_trace(id),
                            );
                        }
                        done = true;
                    }
                    if ui.button("Cancel").clicked()
                        || ui.input(|i| i.key_pressed(egui::Key::Escape))
                    {
                        done = true;
                    }
                });
            });
        if !done {
            self.rename_edit = Some((id, buf));
        }
    }

    fn show_error_modal(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error_modal.clone() else {
            return;
        };
        let mut close = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    close = true;
                }
            });
        if close {
            self.error_modal = None;
        }
    }

    fn handle_screenshot_events(&mut self, ctx: &egui::Context) {
        if self.pending_screenshot.is_none() && !self.pending_clipboard {
            return;
        }
        let shot = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = shot else {
            return;
        };
        if let Some(path) = self.pending_screenshot.take() {
            if let Err(e) = export::save_screenshot_png(&path, &image) {
                eprintln!("Failed to save screenshot {}: {e}", path.display());
                self.error_modal = Some(format!("Screenshot failed:\n{e}"));
            }
        }
        if self.pending_clipboard {
            self.pending_clipboard = false;
            ctx.copy_image((*image).clone());
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // files dropped anywhere on the window
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.open_files(dropped);
        }

        self.handle_screenshot_events(ctx);
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| self.menu_bar(ctx, ui));
        });

        egui::SidePanel::left("tree")
            .default_width(220.0)
            .show(ctx, |ui| {
                self.tree.show(ui, &mut self.model);
                if self.canvas.pick.picked().is_none() {
                    self.tree.handle_keys(ui, &mut self.model);
                }
            });

        if self.gating.show(ctx, &mut self.canvas) {
            self.needs_redraw = true;
        }
        if show_legend_settings(
            ctx,
            &mut self.legend_settings_open,
            &mut self.canvas,
            &mut self.config,
        ) {
            self.needs_redraw = true;
        }
        self.deembed.show(ctx, &mut self.model);
        self.subnetwork.show(ctx, &mut self.model);
        self.show_rename_window(ctx);
        self.show_error_modal(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let effects = self.plot_area.show(ui, &mut self.canvas);
            self.apply_pick_effects(effects);
            if !self.canvas.warnings.is_empty() {
                let text = self.canvas.warnings.join("\n");
                ui.colored_label(egui::Color32::YELLOW, text);
            }
        });

        // model changes collected over the frame drive exactly one rebuild
        let events = self.model.drain_events();
        if !events.is_empty() {
            self.needs_redraw = true;
            self.bus.emit(ViewerEvent::new(EventKind::MODEL_CHANGED));
            for ev in &events {
                if let ModelEvent::NetworkRemoved(id) = ev {
                    self.bus
                        .emit(ViewerEvent::new(EventKind::NETWORK_REMOVED).with_network(*id));
                }
            }
        }
        if self.needs_redraw {
            self.needs_redraw = false;
            self.canvas.redraw(&self.model);
            self.bus.emit(ViewerEvent::new(EventKind::REDRAW));
        }
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.config.save();
    }
}
