//! Bidirectional curve ↔ legend-glyph association.
//!
//! Every visible curve has exactly one legend glyph. Pick events can land on
//! either side; the map resolves both to the canonical data curve. The map
//! is rebuilt wholesale after every add/remove/clear of traces — it is never
//! mutated incrementally, so it can never go stale halfway.

use std::collections::HashMap;

/// Stable identity of a network inside the tree model. Survives row
/// removal of other networks (unlike a bare row index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(pub u64);

/// Stable identity of one plotted trace: a network plus a port pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId {
    pub network: NetworkId,
    pub m: usize,
    pub n: usize,
}

impl TraceId {
    pub fn new(network: NetworkId, m: usize, n: usize) -> Self {
        Self { network, m, n }
    }

    /// Default display label, e.g. `S21` for (m=1, n=0).
    pub fn param_label(&self) -> String {
        format!("S{}{}", self.m + 1, self.n + 1)
    }
}

/// One side of an association pair: the data curve or its legend proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickKey {
    Curve(TraceId),
    Glyph(TraceId),
}

impl PickKey {
    pub fn trace(&self) -> TraceId {
        match self {
            PickKey::Curve(id) | PickKey::Glyph(id) => *id,
        }
    }

    pub fn is_glyph(&self) -> bool {
        matches!(self, PickKey::Glyph(_))
    }
}

/// Symmetric association table between curves and legend glyphs.
#[derive(Debug, Default, Clone)]
pub struct LegendMap {
    pairs: HashMap<PickKey, PickKey>,
}

impl LegendMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the whole table from the current set of plotted traces.
    /// With zero traces the map is left empty (no legend exists).
    pub fn rebuild<I: IntoIterator<Item = TraceId>>(&mut self, ids: I) {
        self.pairs.clear();
        for id in ids {
            self.pairs.insert(PickKey::Curve(id), PickKey::Glyph(id));
            self.pairs.insert(PickKey::Glyph(id), PickKey::Curve(id));
        }
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of curve/glyph pairs (half the key count).
    pub fn len(&self) -> usize {
        self.pairs.len() / 2
    }

    /// The partner of a key: glyph for a curve, curve for a glyph.
    pub fn partner(&self, key: PickKey) -> Option<PickKey> {
        self.pairs.get(&key).copied()
    }

    pub fn contains(&self, key: PickKey) -> bool {
        self.pairs.contains_key(&key)
    }

    /// Resolve any pick target to its canonical data curve. A glyph
    /// resolves to its partner curve; a curve resolves to itself. Keys not
    /// present in the table resolve to `None` — callers treat that as a
    /// no-op rather than an error.
    pub fn resolve(&self, key: PickKey) -> Option<TraceId> {
        match key {
            PickKey::Curve(id) => {
                if self.pairs.contains_key(&key) {
                    Some(id)
                } else {
                    None
                }
            }
            PickKey::Glyph(_) => match self.pairs.get(&key)? {
                PickKey::Curve(id) => Some(*id),
                // a glyph's partner is a curve by construction
                PickKey::Glyph(_) => None,
            },
        }
    }

    /// All trace ids currently in the table, in unspecified order.
    pub fn trace_ids(&self) -> Vec<TraceId> {
        self.pairs
            .keys()
            .filter_map(|k| match k {
                PickKey::Curve(id) => Some(*id),
                PickKey::Glyph(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(nw: u64, m: usize, n: usize) -> TraceId {
        TraceId::new(NetworkId(nw), m, n)
    }

    #[test]
    fn every_key_has_exactly_one_partner() {
        let mut map = LegendMap::new();
        map.rebuild(vec![tid(0, 0, 0), tid(0, 1, 0)]);
        assert_eq!(map.len(), 2);
        for id in [tid(0, 0, 0), tid(0, 1, 0)] {
            assert_eq!(map.partner(PickKey::Curve(id)), Some(PickKey::Glyph(id)));
            assert_eq!(map.partner(PickKey::Glyph(id)), Some(PickKey::Curve(id)));
        }
    }

    #[test]
    fn rebuild_replaces_previous_contents() {
        let mut map = LegendMap::new();
        map.rebuild(vec![tid(0, 0, 0)]);
        map.rebuild(vec![tid(1, 0, 1)]);
        assert_eq!(map.len(), 1);
        assert!(!map.contains(PickKey::Curve(tid(0, 0, 0))));
        assert!(map.contains(PickKey::Curve(tid(1, 0, 1))));
    }

    #[test]
    fn resolve_glyph_and_curve_agree() {
        let mut map = LegendMap::new();
        map.rebuild(vec![tid(2, 0, 1)]);
        let via_curve = map.resolve(PickKey::Curve(tid(2, 0, 1)));
        let via_glyph = map.resolve(PickKey::Glyph(tid(2, 0, 1)));
        assert_eq!(via_curve, via_glyph);
        assert_eq!(via_curve, Some(tid(2, 0, 1)));
    }

    #[test]
    fn unknown_key_resolves_to_none() {
        let map = LegendMap::new();
        assert_eq!(map.resolve(PickKey::Glyph(tid(9, 0, 0))), None);
        assert_eq!(map.resolve(PickKey::Curve(tid(9, 0, 0))), None);
    }

    #[test]
    fn zero_traces_leave_map_empty() {
        let mut map = LegendMap::new();
        map.rebuild(vec![tid(0, 0, 0)]);
        map.rebuild(std::iter::empty());
        assert!(map.is_empty());
    }

    #[test]
    fn param_label_is_one_based() {
        assert_eq!(tid(0, 1, 0).param_label(), "S21");
        assert_eq!(tid(0, 0, 0).param_label(), "S11");
    }
}
