//! Application event bus: bitmask event kinds, filtered subscribers over
//! mpsc channels. Dead subscribers are pruned on emit.

use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::trace_map::{NetworkId, TraceId};

/// Bitmask of event categories. Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    pub const SELECTION_CHANGED: EventKind = EventKind(1 << 0);
    pub const TRACE_PICKED: EventKind = EventKind(1 << 1);
    pub const TRACE_RENAMED: EventKind = EventKind(1 << 2);
    pub const MODEL_CHANGED: EventKind = EventKind(1 << 3);
    pub const NETWORK_ADDED: EventKind = EventKind(1 << 4);
    pub const NETWORK_REMOVED: EventKind = EventKind(1 << 5);
    pub const REDRAW: EventKind = EventKind(1 << 6);
    pub const MODE_CHANGED: EventKind = EventKind(1 << 7);
    pub const EXPORT: EventKind = EventKind(1 << 8);
    pub const DATA_CLEARED: EventKind = EventKind(1 << 9);
    pub const ALL: EventKind = EventKind(u32::MAX);

    pub fn contains(&self, other: EventKind) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn intersects(&self, other: EventKind) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EventKind {
    type Output = EventKind;
    fn bitor(self, rhs: EventKind) -> EventKind {
        EventKind(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventKind {
    fn bitor_assign(&mut self, rhs: EventKind) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for EventKind {
    type Output = EventKind;
    fn bitand(self, rhs: EventKind) -> EventKind {
        EventKind(self.0 & rhs.0)
    }
}

/// One event on the bus. `timestamp` is seconds since bus creation, set on
/// emit.
#[derive(Debug, Clone)]
pub struct ViewerEvent {
    pub kinds: EventKind,
    pub timestamp: f64,
    pub trace: Option<TraceId>,
    pub network: Option<NetworkId>,
    pub detail: Option<String>,
}

impl ViewerEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0,
            trace: None,
            network: None,
            detail: None,
        }
    }

    pub fn with_trace(mut self, trace: TraceId) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn with_network(mut self, network: NetworkId) -> Self {
        self.network = Some(network);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Which events a subscriber wants.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    pub fn matches(&self, event: &ViewerEvent) -> bool {
        self.mask.intersects(event.kinds)
    }
}

struct BusInner {
    subscribers: Vec<(EventFilter, Sender<ViewerEvent>)>,
    start_instant: Instant,
}

/// Shared, cloneable event bus.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                subscribers: Vec::new(),
                start_instant: Instant::now(),
            })),
        }
    }

    /// Subscribe with a filter; only matching events are delivered.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<ViewerEvent> {
        let (tx, rx) = channel();
        if let Ok(mut inner) = self.inner.lock() {
            inner.subscribers.push((filter, tx));
        }
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<ViewerEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Deliver to matching live subscribers. Subscribers whose receiver was
    /// dropped are removed; non-matching subscribers are kept.
    pub fn emit(&self, mut event: ViewerEvent) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|(filter, tx)| {
            if filter.matches(&event) {
                tx.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_union_and_intersection() {
        let k = EventKind::REDRAW | EventKind::MODE_CHANGED;
        assert!(k.contains(EventKind::REDRAW));
        assert!(k.intersects(EventKind::MODE_CHANGED));
        assert!(!k.contains(EventKind::EXPORT));
        assert!((k & EventKind::EXPORT).is_empty());
    }

    #[test]
    fn filtered_delivery() {
        let bus = EventBus::new();
        let redraw_rx = bus.subscribe(EventFilter::only(EventKind::REDRAW));
        let all_rx = bus.subscribe_all();
        bus.emit(ViewerEvent::new(EventKind::MODE_CHANGED));
        bus.emit(ViewerEvent::new(EventKind::REDRAW));
        assert_eq!(redraw_rx.try_iter().count(), 1);
        assert_eq!(all_rx.try_iter().count(), 2);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let rx = bus.subscribe_all();
        drop(rx);
        let live = bus.subscribe_all();
        bus.emit(ViewerEvent::new(EventKind::REDRAW));
        bus.emit(ViewerEvent::new(EventKind::REDRAW));
        assert_eq!(live.try_iter().count(), 2);
    }
}
