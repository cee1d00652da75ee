//! End-to-end behavior of the canvas against the model: curve/legend
//! bookkeeping, picking through redraws, mode switching.

use ndarray::{Array1, Array3};
use num_complex::Complex64;
use touchplot::canvas::{PlotCanvas, PlotMode};
use touchplot::model::NetworkModel;
use touchplot::network::{FreqUnit, Frequency, GateSpec, GateWindow, Network};
use touchplot::{MouseButton, PickEffect, PickKey, TraceId};

fn two_port(name: &str) -> Network {
    let freq = Frequency::from_hz((0..16).map(|i| 1e9 + i as f64 * 1e8).collect(), FreqUnit::GHz);
    let mut s = Array3::from_elem((16, 2, 2), Complex64::new(0.25, 0.0));
    for f in 0..16 {
        s[[f, 1, 0]] = Complex64::new(0.9, 0.0);
        s[[f, 0, 1]] = Complex64::new(0.9, 0.0);
    }
    let mut nw = Network::new(freq, s, Array1::from_elem(2, Complex64::new(50.0, 0.0)));
    nw.name = name.to_string();
    nw
}

fn loaded_canvas() -> (NetworkModel, PlotCanvas) {
    let mut model = NetworkModel::new();
    model.add_network(two_port("dut"));
    let mut canvas = PlotCanvas::new();
    canvas.redraw(&model);
    (model, canvas)
}

#[test]
fn curve_count_tracks_checked_params() {
    let (mut model, mut canvas) = loaded_canvas();
    assert_eq!(canvas.curves().len(), 4);
    let id = canvas.curves()[0].id;
    model.set_checked(id, false);
    canvas.redraw(&model);
    assert_eq!(canvas.curves().len(), 3);
    assert_eq!(canvas.legend().len(), 3);
    assert_eq!(canvas.map.len(), 3);
}

#[test]
fn picked_trace_doubles_width_and_survives_glyph_click() {
    let (_model, mut canvas) = loaded_canvas();
    let id = canvas.curves()[1].id;
    let base = canvas.curves()[1].width;
    canvas.handle_pick(PickKey::Glyph(id), MouseButton::Left);
    let c = canvas.curves().iter().find(|c| c.id == id).unwrap();
    let e = canvas.legend().iter().find(|e| e.id == id).unwrap();
    assert_eq!(c.width, base * 2.0);
    assert_eq!(e.width, base * 2.0);
}

#[test]
fn unchecking_the_picked_trace_clears_the_pick_after_redraw() {
    let (mut model, mut canvas) = loaded_canvas();
    let id = canvas.curves()[0].id;
    canvas.handle_pick(PickKey::Curve(id), MouseButton::Left);
    let leftover = canvas.handle_delete();
    // the canvas keeps the width bookkeeping; uncheck goes to the model
    assert!(leftover.contains(&PickEffect::RequestUncheck(id)));
    model.set_checked(id, false);
    canvas.redraw(&model);
    assert_eq!(canvas.pick.picked(), None);
    assert!(canvas.curves().iter().all(|c| c.id != id));
}

#[test]
fn selection_follows_swapped_picks_across_networks() {
    let mut model = NetworkModel::new();
    let a = model.add_network(two_port("a"));
    let b = model.add_network(two_port("b"));
    let mut canvas = PlotCanvas::new();
    canvas.redraw(&model);
    assert_eq!(canvas.curves().len(), 8);
    let first = TraceId::new(a, 0, 0);
    let second = TraceId::new(b, 1, 1);
    canvas.handle_pick(PickKey::Curve(first), MouseButton::Left);
    let leftover = canvas.handle_pick(PickKey::Glyph(second), MouseButton::Left);
    assert_eq!(
        leftover,
        vec![PickEffect::SelectionChanged(Some(second))]
    );
    // the old pick is back at default width
    let old = canvas.curves().iter().find(|c| c.id == first).unwrap();
    let new = canvas.curves().iter().find(|c| c.id == second).unwrap();
    assert_eq!(old.width * 2.0, new.width);
}

#[test]
fn mode_switch_rebuilds_with_same_trace_set() {
    let (model, mut canvas) = loaded_canvas();
    let ids_before: Vec<_> = canvas.curves().iter().map(|c| c.id).collect();
    canvas.set_mode(PlotMode::Phase);
    canvas.redraw(&model);
    let ids_after: Vec<_> = canvas.curves().iter().map(|c| c.id).collect();
    assert_eq!(ids_before, ids_after);
}

#[test]
fn time_mode_plots_time_axis_in_ns() {
    let (model, mut canvas) = loaded_canvas();
    canvas.set_mode(PlotMode::TimeImpulse);
    canvas.redraw(&model);
    assert!(canvas.warnings.is_empty());
    let pts = &canvas.curves()[0].points;
    assert_eq!(pts.len(), 16);
    assert_eq!(pts[0][0], 0.0);
    assert!(pts[1][0] > 0.0);
}

#[test]
fn gating_with_supported_window_changes_the_curves() {
    let (model, mut canvas) = loaded_canvas();
    canvas.set_mode(PlotMode::Magnitude);
    canvas.redraw(&model);
    let ungated: Vec<[f64; 2]> = canvas.curves()[0].points.clone();
    let dt = 1.0 / (16.0 * 1e8);
    canvas
        .set_gate(Some(GateSpec {
            center: 4.0 * dt,
            span: 2.0 * dt,
            window: GateWindow::Boxcar,
        }))
        .unwrap();
    canvas.redraw(&model);
    assert!(canvas.warnings.is_empty());
    let gated = &canvas.curves()[0].points;
    assert_eq!(gated.len(), ungated.len());
    assert_ne!(*gated, ungated);
}

#[test]
fn single_point_sweep_in_time_mode_warns_instead_of_plotting() {
    let freq = Frequency::from_hz(vec![1e9], FreqUnit::GHz);
    let s = Array3::from_elem((1, 1, 1), Complex64::new(0.5, 0.0));
    let mut nw = Network::new(freq, s, Array1::from_elem(1, Complex64::new(50.0, 0.0)));
    nw.name = "point".to_string();
    let mut model = NetworkModel::new();
    model.add_network(nw);
    let mut canvas = PlotCanvas::new();
    canvas.set_mode(PlotMode::TimeStep);
    canvas.redraw(&model);
    assert!(canvas.curves().is_empty());
    assert_eq!(canvas.warnings.len(), 1);
}
