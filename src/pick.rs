//! Pick/highlight state machine for plotted curves and legend glyphs.
//!
//! Pure state transitions: every handler returns a list of [`PickEffect`]s
//! for the canvas/app to apply (width changes, selection pushes, uncheck
//! requests). This keeps the machine testable without a UI.
//!
//! Phases:
//! - `Idle`: nothing picked.
//! - `Picked`: a curve is highlighted, mouse release pending.
//! - `ArmedForClear`: released once while picked; the next background
//!   click-release clears the pick. The intermediate phase exists so that
//!   releasing a legend drag does not lose the selection.

use crate::trace_map::{LegendMap, PickKey, TraceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PickPhase {
    #[default]
    Idle,
    Picked,
    ArmedForClear,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickEffect {
    /// Double the line width of this trace's curve and its legend glyph.
    Highlight(TraceId),
    /// Restore this trace's curve and glyph to the default width.
    Unhighlight(TraceId),
    /// Restore every curve and glyph to the default width.
    ResetAllWidths,
    /// Push the new selection into the tree selection model and notify
    /// listeners.
    SelectionChanged(Option<TraceId>),
    /// Uncheck the param node backing this trace; the trace disappears on
    /// the next model-driven redraw.
    RequestUncheck(TraceId),
}

#[derive(Debug, Default, Clone)]
pub struct PickState {
    phase: PickPhase,
    picked: Option<TraceId>,
}

impl PickState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PickPhase {
        self.phase
    }

    /// The currently highlighted trace, always canonical (never a glyph).
    pub fn picked(&self) -> Option<TraceId> {
        self.picked
    }

    /// A pick event landed on a curve or glyph. Left button only. Keys that
    /// do not resolve through the map are ignored.
    pub fn on_pick(
        &mut self,
        map: &LegendMap,
        key: PickKey,
        button: MouseButton,
    ) -> Vec<PickEffect> {
        if button != MouseButton::Left {
            return Vec::new();
        }
        let Some(id) = map.resolve(key) else {
            return Vec::new();
        };
        if self.picked == Some(id) {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if let Some(prev) = self.picked {
            effects.push(PickEffect::Unhighlight(prev));
        }
        effects.push(PickEffect::Highlight(id));
        self.picked = Some(id);
        self.phase = PickPhase::Picked;
        effects.push(PickEffect::SelectionChanged(Some(id)));
        effects
    }

    /// A mouse button was released anywhere on the canvas.
    pub fn on_release(&mut self, button: MouseButton) -> Vec<PickEffect> {
        if button != MouseButton::Left {
            return Vec::new();
        }
        match (self.picked, self.phase) {
            (None, _) => {
                self.phase = PickPhase::Idle;
                vec![PickEffect::ResetAllWidths]
            }
            (Some(_), PickPhase::Picked) => {
                // keep the selection through a drag-release
                self.phase = PickPhase::ArmedForClear;
                Vec::new()
            }
            (Some(id), PickPhase::ArmedForClear) => {
                self.picked = None;
                self.phase = PickPhase::Idle;
                vec![
                    PickEffect::Unhighlight(id),
                    PickEffect::SelectionChanged(None),
                ]
            }
            (Some(_), PickPhase::Idle) => Vec::new(),
        }
    }

    /// Delete key: never mutates the plot directly — requests the model to
    /// uncheck the node, and clears the pick.
    pub fn on_delete(&mut self) -> Vec<PickEffect> {
        let Some(id) = self.picked.take() else {
            return Vec::new();
        };
        self.phase = PickPhase::Idle;
        vec![
            PickEffect::RequestUncheck(id),
            PickEffect::Unhighlight(id),
            PickEffect::SelectionChanged(None),
        ]
    }

    /// Rename key (F2): the UI opens a label prompt for the returned trace.
    pub fn rename_target(&self) -> Option<TraceId> {
        self.picked
    }

    /// Redraw wipes all curves, so any pick is stale. No effects: the
    /// curves it would have touched are gone.
    pub fn clear_on_redraw(&mut self) {
        self.picked = None;
        self.phase = PickPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_map::NetworkId;

    fn tid(m: usize, n: usize) -> TraceId {
        TraceId::new(NetworkId(0), m, n)
    }

    fn map_of(ids: &[TraceId]) -> LegendMap {
        let mut map = LegendMap::new();
        map.rebuild(ids.iter().copied());
        map
    }

    #[test]
    fn glyph_and_curve_pick_agree() {
        let map = map_of(&[tid(0, 0)]);
        let mut a = PickState::new();
        let mut b = PickState::new();
        a.on_pick(&map, PickKey::Curve(tid(0, 0)), MouseButton::Left);
        b.on_pick(&map, PickKey::Glyph(tid(0, 0)), MouseButton::Left);
        assert_eq!(a.picked(), b.picked());
        assert_eq!(a.phase(), b.phase());
    }

    #[test]
    fn right_button_is_ignored() {
        let map = map_of(&[tid(0, 0)]);
        let mut st = PickState::new();
        assert!(st
            .on_pick(&map, PickKey::Curve(tid(0, 0)), MouseButton::Right)
            .is_empty());
        assert_eq!(st.picked(), None);
    }

    #[test]
    fn picking_a_second_trace_swaps_highlight() {
        let map = map_of(&[tid(0, 0), tid(1, 0)]);
        let mut st = PickState::new();
        st.on_pick(&map, PickKey::Curve(tid(0, 0)), MouseButton::Left);
        let fx = st.on_pick(&map, PickKey::Glyph(tid(1, 0)), MouseButton::Left);
        assert_eq!(
            fx,
            vec![
                PickEffect::Unhighlight(tid(0, 0)),
                PickEffect::Highlight(tid(1, 0)),
                PickEffect::SelectionChanged(Some(tid(1, 0))),
            ]
        );
        assert_eq!(st.picked(), Some(tid(1, 0)));
    }

    #[test]
    fn release_sequence_clears_on_second_background_release() {
        let map = map_of(&[tid(0, 0)]);
        let mut st = PickState::new();
        st.on_pick(&map, PickKey::Curve(tid(0, 0)), MouseButton::Left);
        // release of the picking click: armed, selection kept
        assert!(st.on_release(MouseButton::Left).is_empty());
        assert_eq!(st.phase(), PickPhase::ArmedForClear);
        assert_eq!(st.picked(), Some(tid(0, 0)));
        // next background release clears
        let fx = st.on_release(MouseButton::Left);
        assert!(fx.contains(&PickEffect::Unhighlight(tid(0, 0))));
        assert!(fx.contains(&PickEffect::SelectionChanged(None)));
        assert_eq!(st.picked(), None);
        assert_eq!(st.phase(), PickPhase::Idle);
    }

    #[test]
    fn release_with_no_pick_resets_widths() {
        let mut st = PickState::new();
        assert_eq!(
            st.on_release(MouseButton::Left),
            vec![PickEffect::ResetAllWidths]
        );
    }

    #[test]
    fn stale_glyph_pick_is_a_noop() {
        // glyph whose curve is gone from the map: must not panic, must not pick
        let map = map_of(&[]);
        let mut st = PickState::new();
        let fx = st.on_pick(&map, PickKey::Glyph(tid(3, 3)), MouseButton::Left);
        assert!(fx.is_empty());
        assert_eq!(st.picked(), None);
    }

    #[test]
    fn delete_requests_uncheck_and_clears() {
        let map = map_of(&[tid(0, 1)]);
        let mut st = PickState::new();
        st.on_pick(&map, PickKey::Curve(tid(0, 1)), MouseButton::Left);
        let fx = st.on_delete();
        assert!(fx.contains(&PickEffect::RequestUncheck(tid(0, 1))));
        assert_eq!(st.picked(), None);
        // delete with no pick does nothing
        assert!(st.on_delete().is_empty());
    }

    #[test]
    fn repicking_same_trace_changes_nothing() {
        let map = map_of(&[tid(0, 0)]);
        let mut st = PickState::new();
        st.on_pick(&map, PickKey::Curve(tid(0, 0)), MouseButton::Left);
        let fx = st.on_pick(&map, PickKey::Glyph(tid(0, 0)), MouseButton::Left);
        assert!(fx.is_empty());
        assert_eq!(st.phase(), PickPhase::Picked);
    }
}
