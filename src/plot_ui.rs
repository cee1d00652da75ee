//! egui_plot rendering of the canvas: curves, hit-testing for picks, and
//! the movable, clickable legend overlay.
//!
//! The built-in egui_plot legend has no per-entry hit-testing, so the
//! legend is drawn as a floating `Area` whose glyphs feed the same pick
//! machinery as the curves.

use egui::{Pos2, Sense, Ui, Vec2};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints};

use crate::canvas::{AxisDomain, PlotCanvas};
use crate::pick::{MouseButton, PickEffect};
use crate::trace_map::PickKey;

/// Pick radius around a curve, in screen pixels.
const PICK_RADIUS_PX: f32 = 6.0;

pub struct PlotArea {
    legend_pos: Option<Pos2>,
}

impl Default for PlotArea {
    fn default() -> Self {
        Self { legend_pos: None }
    }
}

impl PlotArea {
    /// Draw the plot and legend; returns the pick effects the canvas could
    /// not apply itself (selection sync, uncheck requests).
    pub fn show(&mut self, ui: &mut Ui, canvas: &mut PlotCanvas) -> Vec<PickEffect> {
        let mut leftover = Vec::new();

        let domain = canvas.mode().domain();
        let x_label = match domain {
            AxisDomain::Frequency => "f [Hz]",
            AxisDomain::Time => "t [ns]",
            AxisDomain::Smith => "Re Γ",
        };
        let mut plot = Plot::new("canvas")
            .x_axis_label(x_label)
            .y_axis_label(canvas.mode().y_label())
            .show_grid(egui::Vec2b::from(canvas.show_grid));
        if domain == AxisDomain::Smith {
            plot = plot.data_aspect(1.0);
        }

        let applied_range = canvas.applied_x_range();
        let inner = plot.show(ui, |plot_ui| {
            if let Some((min, max)) = applied_range {
                plot_ui.set_plot_bounds_x(min..=max);
            }
            for curve in canvas.curves() {
                plot_ui.line(
                    Line::new(curve.label.clone(), PlotPoints::from(curve.points.clone()))
                        .color(curve.color)
                        .width(curve.width),
                );
            }
            *plot_ui.transform()
        });
        let transform = inner.inner;
        let response = &inner.response;

        let (pressed, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        if pressed && response.hovered() {
            if let Some(pos) = pointer {
                if let Some(id) = hit_test(canvas, &transform, pos) {
                    leftover.extend(canvas.handle_pick(PickKey::Curve(id), MouseButton::Left));
                }
            }
        }
        if released && response.hovered() {
            leftover.extend(canvas.handle_release(MouseButton::Left));
        }

        // remember a user zoom in the current domain
        let scrolled = response.hovered() && ui.input(|i| i.smooth_scroll_delta != Vec2::ZERO);
        if response.drag_stopped() || scrolled {
            let bounds = transform.bounds();
            canvas.set_x_range(bounds.min()[0], bounds.max()[0]);
        }
        if response.double_clicked() {
            canvas.clear_x_range();
        }

        leftover.extend(self.show_legend(ui, canvas, response.rect));
        leftover
    }

    /// Floating legend: a draggable area with one glyph + label per curve,
    /// laid out in the configured number of columns.
    fn show_legend(
        &mut self,
        ui: &mut Ui,
        canvas: &mut PlotCanvas,
        plot_rect: egui::Rect,
    ) -> Vec<PickEffect> {
        let mut leftover = Vec::new();
        if canvas.legend().is_empty() {
            return leftover;
        }
        let default_pos = plot_rect.right_top() + Vec2::new(-180.0, 12.0);
        let pos = self.legend_pos.unwrap_or(default_pos);
        let area = egui::Area::new(egui::Id::new("plot_legend"))
            .current_pos(pos)
            .movable(true);
        let area_resp = area.show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let columns = canvas.legend_columns.max(1);
                let mut picked_key = None;
                egui::Grid::new("legend_grid")
                    .num_columns(columns)
                    .spacing(Vec2::new(12.0, 2.0))
                    .show(ui, |ui| {
                        for (i, entry) in canvas.legend().iter().enumerate() {
                            ui.horizontal(|ui| {
                                let (rect, glyph) =
                                    ui.allocate_exact_size(Vec2::new(24.0, 12.0), Sense::click());
                                ui.painter().line_segment(
                                    [rect.left_center(), rect.right_center()],
                                    egui::Stroke::new(entry.width, entry.color),
                                );
                                let label = ui.add(
                                    egui::Label::new(&entry.label).sense(Sense::click()),
                                );
                                if glyph.clicked() || label.clicked() {
                                    picked_key = Some(PickKey::Glyph(entry.id));
                                }
                            });
                            if (i + 1) % columns == 0 {
                                ui.end_row();
                            }
                        }
                    });
                if let Some(key) = picked_key {
                    leftover.extend(canvas.handle_pick(key, MouseButton::Left));
                }
            });
        });
        self.legend_pos = Some(area_resp.response.rect.min);
        leftover
    }
}

/// Nearest curve within [`PICK_RADIUS_PX`] of the pointer, in screen
/// space. Distance is measured to the drawn segments, not just the
/// samples, so sparsely sampled curves stay pickable between points.
fn hit_test(
    canvas: &PlotCanvas,
    transform: &egui_plot::PlotTransform,
    pointer: Pos2,
) -> Option<crate::trace_map::TraceId> {
    let mut best: Option<(f32, crate::trace_map::TraceId)> = None;
    for curve in canvas.curves() {
        let screen: Vec<Pos2> = curve
            .points
            .iter()
            .map(|p| transform.position_from_point(&PlotPoint::new(p[0], p[1])))
            .collect();
        let mut consider = |d: f32| {
            if d <= PICK_RADIUS_PX && best.map(|(bd, _)| d < bd).unwrap_or(true) {
                best = Some((d, curve.id));
            }
        };
        if let [only] = screen.as_slice() {
            consider(only.distance(pointer));
        }
        for w in screen.windows(2) {
            consider(segment_distance(pointer, w[0], w[1]));
        }
    }
    best.map(|(_, id)| id)
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_covers_the_span_between_samples() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(100.0, 0.0);
        // midpoint: far from both endpoints, on the drawn line
        assert_eq!(segment_distance(Pos2::new(50.0, 3.0), a, b), 3.0);
        // beyond the ends the distance is to the nearest endpoint
        assert_eq!(segment_distance(Pos2::new(-4.0, 0.0), a, b), 4.0);
        assert_eq!(segment_distance(Pos2::new(104.0, 0.0), a, b), 4.0);
        // degenerate segment falls back to point distance
        assert_eq!(segment_distance(Pos2::new(3.0, 4.0), a, a), 5.0);
    }
}
