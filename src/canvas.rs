//! Plot canvas state: the curves currently on screen, their legend
//! entries, the pick machinery, and the display mode.
//!
//! Everything here is plain state so the rebuild/pick/mode logic stays
//! testable without a window; the egui drawing lives in `plot_ui`.

use std::collections::HashMap;
use std::str::FromStr;

use egui::Color32;
use thiserror::Error;

use crate::model::NetworkModel;
use crate::network::{gate, step_response, time_response, DspError, GateSpec};
use crate::pick::{MouseButton, PickEffect, PickState};
use crate::trace_map::{LegendMap, PickKey, TraceId};

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("unknown plot mode: {0}")]
    UnknownMode(String),
    #[error(transparent)]
    Dsp(#[from] DspError),
}

/// What quantity the canvas plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlotMode {
    Db,
    Magnitude,
    Phase,
    Real,
    Imaginary,
    Smith,
    TimeImpulse,
    TimeStep,
}

impl PlotMode {
    pub const ALL: [PlotMode; 8] = [
        PlotMode::Db,
        PlotMode::Magnitude,
        PlotMode::Phase,
        PlotMode::Real,
        PlotMode::Imaginary,
        PlotMode::Smith,
        PlotMode::TimeImpulse,
        PlotMode::TimeStep,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PlotMode::Db => "dB",
            PlotMode::Magnitude => "Magnitude",
            PlotMode::Phase => "Phase",
            PlotMode::Real => "Real",
            PlotMode::Imaginary => "Imaginary",
            PlotMode::Smith => "Smith",
            PlotMode::TimeImpulse => "Time (impulse)",
            PlotMode::TimeStep => "Time (step)",
        }
    }

    pub fn domain(&self) -> AxisDomain {
        match self {
            PlotMode::Db
            | PlotMode::Magnitude
            | PlotMode::Phase
            | PlotMode::Real
            | PlotMode::Imaginary => AxisDomain::Frequency,
            PlotMode::Smith => AxisDomain::Smith,
            PlotMode::TimeImpulse | PlotMode::TimeStep => AxisDomain::Time,
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            PlotMode::Db => "|S| [dB]",
            PlotMode::Magnitude => "|S|",
            PlotMode::Phase => "arg S [deg]",
            PlotMode::Real => "Re S",
            PlotMode::Imaginary => "Im S",
            PlotMode::Smith => "Im Γ",
            PlotMode::TimeImpulse | PlotMode::TimeStep => "amplitude",
        }
    }
}

impl FromStr for PlotMode {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "db" => Ok(PlotMode::Db),
            "magnitude" | "mag" => Ok(PlotMode::Magnitude),
            "phase" => Ok(PlotMode::Phase),
            "real" | "re" => Ok(PlotMode::Real),
            "imaginary" | "im" => Ok(PlotMode::Imaginary),
            "smith" => Ok(PlotMode::Smith),
            "time (impulse)" | "impulse" => Ok(PlotMode::TimeImpulse),
            "time (step)" | "step" => Ok(PlotMode::TimeStep),
            other => Err(CanvasError::UnknownMode(other.to_string())),
        }
    }
}

/// X-axis domain an axis range belongs to. A range saved while zoomed in
/// frequency must not be applied to a time-domain plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDomain {
    Frequency,
    Time,
    Smith,
}

/// User-set x-range, tagged with the domain it was set in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub domain: AxisDomain,
    pub min: f64,
    pub max: f64,
}

const PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
];

pub const DEFAULT_LINE_WIDTH: f32 = 1.5;

/// One plotted line.
#[derive(Debug, Clone)]
pub struct Curve {
    pub id: TraceId,
    pub label: String,
    pub points: Vec<[f64; 2]>,
    pub width: f32,
    pub color: Color32,
}

/// One legend row, mirroring a curve.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub id: TraceId,
    pub label: String,
    pub color: Color32,
    pub width: f32,
}

#[derive(Debug, Clone)]
pub struct PlotCanvas {
    curves: Vec<Curve>,
    legend: Vec<LegendEntry>,
    pub map: LegendMap,
    pub pick: PickState,
    mode: PlotMode,
    pub show_grid: bool,
    pub legend_columns: usize,
    pub default_width: f32,
    x_range: Option<AxisRange>,
    gate_spec: Option<GateSpec>,
    label_overrides: HashMap<TraceId, String>,
    /// Non-fatal problems from the last rebuild, shown in the status area.
    pub warnings: Vec<String>,
}

impl Default for PlotCanvas {
    fn default() -> Self {
        Self {
            curves: Vec::new(),
            legend: Vec::new(),
            map: LegendMap::new(),
            pick: PickState::new(),
            mode: PlotMode::Db,
            show_grid: true,
            legend_columns: 1,
            default_width: DEFAULT_LINE_WIDTH,
            x_range: None,
            gate_spec: None,
            label_overrides: HashMap::new(),
            warnings: Vec::new(),
        }
    }
}

impl PlotCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    pub fn mode(&self) -> PlotMode {
        self.mode
    }

    pub fn gate_spec(&self) -> Option<GateSpec> {
        self.gate_spec
    }

    /// Switch display mode. A stored x-range from a different domain is
    /// dropped; same-domain ranges survive. The caller redraws afterwards.
    pub fn set_mode(&mut self, mode: PlotMode) {
        if let Some(r) = self.x_range {
            if r.domain != mode.domain() {
                self.x_range = None;
            }
        }
        self.mode = mode;
    }

    /// Install or clear the time gate. The window is validated up front so
    /// an unsupported shape leaves the previous gate untouched.
    pub fn set_gate(&mut self, spec: Option<GateSpec>) -> Result<(), DspError> {
        if let Some(spec) = &spec {
            spec.window.ensure_supported()?;
        }
        self.gate_spec = spec;
        Ok(())
    }

    /// Store the user's x-zoom, tagged with the current mode's domain.
    pub fn set_x_range(&mut self, min: f64, max: f64) {
        self.x_range = Some(AxisRange {
            domain: self.mode.domain(),
            min,
            max,
        });
    }

    pub fn clear_x_range(&mut self) {
        self.x_range = None;
    }

    /// The stored x-range, but only when it was set in the current mode's
    /// domain. `set_mode` drops cross-domain ranges; this filter is the
    /// invariant, not the mechanism.
    pub fn applied_x_range(&self) -> Option<(f64, f64)> {
        self.x_range
            .filter(|r| r.domain == self.mode.domain())
            .map(|r| (r.min, r.max))
    }

    /// Legend label for a trace: the user override if one exists, else
    /// `name.Smn`.
    fn label_for(&self, model: &NetworkModel, id: TraceId) -> String {
        if let Some(l) = self.label_overrides.get(&id) {
            return l.clone();
        }
        let name = model
            .node(id.network)
            .map(|n| n.name().to_string())
            .unwrap_or_default();
        format!("{}.{}", name, id.param_label())
    }

    /// Override a trace's legend label. Only the label changes; data,
    /// color and width are untouched. Overrides survive redraws.
    pub fn rename_label(&mut self, id: TraceId, label: impl Into<String>) {
        let label = label.into();
        self.label_overrides.insert(id, label.clone());
        if let Some(c) = self.curves.iter_mut().find(|c| c.id == id) {
            c.label = label.clone();
        }
        if let Some(e) = self.legend.iter_mut().find(|e| e.id == id) {
            e.label = label;
        }
    }

    /// Rebuild every curve and the legend from the model's checked params.
    /// Any existing pick is stale afterwards.
    pub fn redraw(&mut self, model: &NetworkModel) {
        self.pick.clear_on_redraw();
        self.curves.clear();
        self.legend.clear();
        self.warnings.clear();
        // overrides for traces of removed networks must not pile up
        self.label_overrides
            .retain(|id, _| model.node(id.network).is_some());

        let enabled = model.enabled_params();
        for (idx, id) in enabled.iter().enumerate() {
            let Some(network) = model.network(id.network) else {
                continue;
            };
            let mut s_col = network.s_complex(id.m, id.n);
            // the gate acts on frequency-domain data; Smith renders the
            // same data parametrically, so it is gated as well
            if self.mode.domain() != AxisDomain::Time {
                if let Some(spec) = &self.gate_spec {
                    match gate(&network.frequency, &s_col, spec) {
                        Ok(gated) => s_col = gated,
                        Err(e) => self
                            .warnings
                            .push(format!("{}: gating skipped: {e}", self.label_for(model, *id))),
                    }
                }
            }
            let points = match self.mode {
                PlotMode::Db => freq_points(
                    network.frequency.f().to_vec(),
                    s_col.iter().map(|v| 20.0 * v.norm().log10()).collect(),
                ),
                PlotMode::Magnitude => {
                    freq_points(network.frequency.f().to_vec(), mags(&s_col))
                }
                PlotMode::Phase => freq_points(
                    network.frequency.f().to_vec(),
                    s_col.iter().map(|v| v.arg().to_degrees()).collect(),
                ),
                PlotMode::Real => freq_points(
                    network.frequency.f().to_vec(),
                    s_col.iter().map(|v| v.re).collect(),
                ),
                PlotMode::Imaginary => freq_points(
                    network.frequency.f().to_vec(),
                    s_col.iter().map(|v| v.im).collect(),
                ),
                PlotMode::Smith => s_col.iter().map(|v| [v.re, v.im]).collect(),
                PlotMode::TimeImpulse => match time_response(&network.frequency, &s_col) {
                    Ok(td) => td.into_iter().map(|(t, v)| [t * 1e9, v.norm()]).collect(),
                    Err(e) => {
                        self.warnings
                            .push(format!("{}: {e}", self.label_for(model, *id)));
                        continue;
                    }
                },
                PlotMode::TimeStep => match step_response(&network.frequency, &s_col) {
                    Ok(td) => td.into_iter().map(|(t, v)| [t * 1e9, v.norm()]).collect(),
                    Err(e) => {
                        self.warnings
                            .push(format!("{}: {e}", self.label_for(model, *id)));
                        continue;
                    }
                },
            };
            let label = self.label_for(model, *id);
            let color = PALETTE[idx % PALETTE.len()];
            self.curves.push(Curve {
                id: *id,
                label: label.clone(),
                points,
                width: self.default_width,
                color,
            });
            self.legend.push(LegendEntry {
                id: *id,
                label,
                color,
                width: self.default_width,
            });
        }
        self.map.rebuild(self.curves.iter().map(|c| c.id));
    }

    /// Forward a pick landing on a curve or glyph; width effects are
    /// applied here, the rest is returned for the app to handle.
    pub fn handle_pick(&mut self, key: PickKey, button: MouseButton) -> Vec<PickEffect> {
        let effects = self.pick.on_pick(&self.map, key, button);
        self.apply_width_effects(&effects)
    }

    pub fn handle_release(&mut self, button: MouseButton) -> Vec<PickEffect> {
        let effects = self.pick.on_release(button);
        self.apply_width_effects(&effects)
    }

    pub fn handle_delete(&mut self) -> Vec<PickEffect> {
        let effects = self.pick.on_delete();
        self.apply_width_effects(&effects)
    }

    /// Apply the width-changing effects to curves and legend entries;
    /// return the effects the canvas cannot handle itself.
    fn apply_width_effects(&mut self, effects: &[PickEffect]) -> Vec<PickEffect> {
        let mut leftover = Vec::new();
        for effect in effects {
            match effect {
                PickEffect::Highlight(id) => self.set_width(*id, self.default_width * 2.0),
                PickEffect::Unhighlight(id) => self.set_width(*id, self.default_width),
                PickEffect::ResetAllWidths => {
                    let w = self.default_width;
                    for c in &mut self.curves {
                        c.width = w;
                    }
                    for e in &mut self.legend {
                        e.width = w;
                    }
                }
                other => leftover.push(other.clone()),
            }
        }
        leftover
    }

    fn set_width(&mut self, id: TraceId, width: f32) {
        if let Some(c) = self.curves.iter_mut().find(|c| c.id == id) {
            c.width = width;
        }
        if let Some(e) = self.legend.iter_mut().find(|e| e.id == id) {
            e.width = width;
        }
    }
}

fn freq_points(x: Vec<f64>, y: Vec<f64>) -> Vec<[f64; 2]> {
    x.into_iter().zip(y).map(|(x, y)| [x, y]).collect()
}

fn mags(s: &[num_complex::Complex64]) -> Vec<f64> {
    s.iter().map(|v| v.norm()).collect()
}
